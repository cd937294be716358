use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::classify::{classify, ConnectAttempt};
use crate::domain::{ProbeOutcome, ResolvedAddress, TimeoutBudget};
use crate::ports::ProberPort;
use async_trait::async_trait;
use log::debug;
use tokio::net::TcpStream;
use tokio::time::{timeout, Instant};

/// Prober opening a plain TCP connection and dropping it right away
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProber;

impl TcpProber {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProberPort for TcpProber {
    async fn probe(&self, target: &ResolvedAddress, port: u16, budget: &TimeoutBudget) -> ProbeOutcome {
        let addr = SocketAddr::new(target.ip_address, port);
        debug!("Probing {} ({}) with a {:?} limit", addr, target.hostname, budget.effective_duration());
        probe_connect(TcpStream::connect(addr), budget.effective_duration()).await
    }
}

/// Drive `connect` for at most `limit` and classify what happened.
///
/// Whatever `connect` yields is dropped before returning.
pub async fn probe_connect<F, S>(connect: F, limit: Duration) -> ProbeOutcome
where
    F: Future<Output = io::Result<S>>,
{
    let started = Instant::now();
    let result = timeout(limit, connect).await;
    let elapsed = started.elapsed();

    let attempt = match result {
        Ok(Ok(stream)) => {
            drop(stream);
            ConnectAttempt::connected(elapsed, limit)
        }
        Ok(Err(e)) => {
            debug!("Connect failed after {:?}: {}", elapsed, e);
            ConnectAttempt::failed(elapsed, limit, &e)
        }
        Err(_) => {
            debug!("Connect timed out after {:?}", elapsed);
            ConnectAttempt::elapsed(elapsed, limit)
        }
    };
    classify(&attempt)
}
