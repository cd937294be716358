#![cfg(test)]
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpListener;

use preflight::adapters::{probe_connect, MemorySink, TcpProber};
use preflight::domain::{DnsError, ProbeOutcome, ResolvedAddress, TimeoutBudget};
use preflight::ports::{ProberPort, ResolverPort};
use preflight::{ConnectionGate, PreflightConfig};

/// Resolver answering from a fixed host table, standing in for local DNS.
pub struct StaticResolver {
    hosts: HashMap<String, IpAddr>,
    calls: AtomicUsize,
}

impl StaticResolver {
    pub fn new(hosts: &[(&str, IpAddr)]) -> Self {
        Self {
            hosts: hosts.iter().map(|(name, ip)| (name.to_string(), *ip)).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResolverPort for StaticResolver {
    async fn resolve(&self, host: &str, _: &TimeoutBudget) -> Result<ResolvedAddress, DnsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.hosts
            .get(host)
            .map(|ip| ResolvedAddress::new(host, *ip))
            .ok_or_else(|| DnsError::new(format!("{}: name or service not known", host)))
    }
}

/// Wraps another prober and counts how many probes went through it.
pub struct CountingProber<P> {
    inner: P,
    calls: AtomicUsize,
}

impl<P> CountingProber<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P: ProberPort> ProberPort for CountingProber<P> {
    async fn probe(&self, target: &ResolvedAddress, port: u16, budget: &TimeoutBudget) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.probe(target, port, budget).await
    }
}

/// A powered-off device: the handshake never completes.
pub struct BlackholeProber;

#[async_trait]
impl ProberPort for BlackholeProber {
    async fn probe(&self, _: &ResolvedAddress, _: u16, budget: &TimeoutBudget) -> ProbeOutcome {
        probe_connect(std::future::pending::<std::io::Result<()>>(), budget.effective_duration()).await
    }
}

pub fn tcp_prober() -> CountingProber<TcpProber> {
    CountingProber::new(TcpProber::new())
}

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind listener");
    let port = listener.local_addr().expect("Failed to read listener address").port();
    drop(listener);
    port
}

/// A gate wired to a memory sink, keeping typed handles on its ports.
pub struct GateFixture<R, P> {
    pub gate: ConnectionGate,
    pub resolver: Arc<R>,
    pub prober: Arc<P>,
    pub sink: Arc<MemorySink>,
}

impl<R, P> GateFixture<R, P>
where
    R: ResolverPort + 'static,
    P: ProberPort + 'static,
{
    pub fn new(resolver: R, prober: P) -> Self {
        Self::with_config(PreflightConfig::default(), resolver, prober)
    }

    pub fn with_config(config: PreflightConfig, resolver: R, prober: P) -> Self {
        let resolver = Arc::new(resolver);
        let prober = Arc::new(prober);
        let sink = Arc::new(MemorySink::new());
        let gate = ConnectionGate::new(config, resolver.clone(), prober.clone(), sink.clone());
        Self {
            gate,
            resolver,
            prober,
            sink,
        }
    }
}
