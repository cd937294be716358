use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use super::{GateError, GateErrorKind};

/// Upper bound on how long the preflight probe waits at each stage.
///
/// The real connection still gets the caller's full timeout; only the
/// resolve and connect probes are held to this.
pub const PROBE_TIMEOUT_CAP_SECS: f64 = 5.0;

/// A validated `scheme://host:port` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    raw: String,
    scheme: String,
    host: String,
    port: u16,
}

impl Address {
    pub(crate) fn new(raw: String, scheme: String, host: String, port: u16) -> Self {
        Self {
            raw,
            scheme,
            host,
            port,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeoutBudget {
    requested_secs: f64,
    effective_secs: f64,
}

impl TimeoutBudget {
    /// Computes `effective = min(requested, cap)`.
    ///
    /// Negative and NaN requests are rejected. Zero is accepted and makes
    /// every stage time out immediately.
    pub fn new(requested_secs: f64, cap_secs: f64) -> Result<Self, GateError> {
        if requested_secs.is_nan() || requested_secs < 0.0 {
            return Err(GateError::InvalidTimeout(requested_secs));
        }
        Ok(Self {
            requested_secs,
            effective_secs: requested_secs.min(cap_secs.max(0.0)),
        })
    }

    pub fn requested_secs(&self) -> f64 {
        self.requested_secs
    }

    pub fn effective_secs(&self) -> f64 {
        self.effective_secs
    }

    /// The caller's uncapped timeout, saturating for values `Duration` cannot hold.
    pub fn requested_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.requested_secs).unwrap_or(Duration::MAX)
    }

    pub fn effective_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.effective_secs).unwrap_or(Duration::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub hostname: String,
    pub ip_address: IpAddr,
}

impl ResolvedAddress {
    pub fn new(hostname: impl Into<String>, ip_address: IpAddr) -> Self {
        Self {
            hostname: hostname.into(),
            ip_address,
        }
    }
}

/// Result of the resolve + probe stages of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success,
    DnsFailure(String),
    ConnectTimeout,
    ConnectionRefused,
    NetworkUnreachable(String),
    Other(String),
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success)
    }

    pub fn to_error(&self) -> Option<GateError> {
        match self {
            ProbeOutcome::Success => None,
            ProbeOutcome::DnsFailure(reason) => Some(GateError::DnsFailure(reason.clone())),
            ProbeOutcome::ConnectTimeout => Some(GateError::ConnectTimeout),
            ProbeOutcome::ConnectionRefused => Some(GateError::ConnectionRefused),
            ProbeOutcome::NetworkUnreachable(reason) => Some(GateError::NetworkUnreachable(reason.clone())),
            ProbeOutcome::Other(reason) => Some(GateError::ProbeFailed(reason.clone())),
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Success => write!(f, "success"),
            ProbeOutcome::DnsFailure(reason) => write!(f, "dns failure: {}", reason),
            ProbeOutcome::ConnectTimeout => write!(f, "connect timeout"),
            ProbeOutcome::ConnectionRefused => write!(f, "connection refused"),
            ProbeOutcome::NetworkUnreachable(reason) => write!(f, "network unreachable: {}", reason),
            ProbeOutcome::Other(reason) => write!(f, "other: {}", reason),
        }
    }
}

/// Proof that every preflight stage passed for one address.
///
/// Only the gate builds these. The connector must be handed
/// [`raw`](Self::raw), [`baudrate`](Self::baudrate) and
/// [`requested_timeout`](Self::requested_timeout), never the capped probe timeout.
#[derive(Debug, Clone)]
pub struct ConnectionAuthorization {
    address: Address,
    budget: TimeoutBudget,
    baudrate: u32,
    attempt_id: uuid::Uuid,
}

impl ConnectionAuthorization {
    pub(crate) fn new(address: Address, budget: TimeoutBudget, baudrate: u32, attempt_id: uuid::Uuid) -> Self {
        Self {
            address,
            budget,
            baudrate,
            attempt_id,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn raw(&self) -> &str {
        self.address.raw()
    }

    pub fn budget(&self) -> &TimeoutBudget {
        &self.budget
    }

    pub fn baudrate(&self) -> u32 {
        self.baudrate
    }

    pub fn requested_timeout(&self) -> Duration {
        self.budget.requested_duration()
    }

    pub fn attempt_id(&self) -> uuid::Uuid {
        self.attempt_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Parse,
    Resolve,
    Probe,
    Connect,
}

impl Stage {
    /// Operator-facing step number for the network stages.
    pub fn step(&self) -> Option<u8> {
        match self {
            Stage::Resolve => Some(1),
            Stage::Probe => Some(2),
            Stage::Parse | Stage::Connect => None,
        }
    }

    pub const NETWORK_STEPS: u8 = 2;
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Parse => write!(f, "parse"),
            Stage::Resolve => write!(f, "resolve"),
            Stage::Probe => write!(f, "probe"),
            Stage::Connect => write!(f, "connect"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Start,
    Parsed,
    Resolved,
    Probed,
    Authorized,
    Failed(GateErrorKind),
}

impl GateState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GateState::Authorized | GateState::Failed(_))
    }

    /// Forward-only: each state has one successor, any live state may fail.
    pub fn can_advance_to(&self, next: &GateState) -> bool {
        match (self, next) {
            (GateState::Authorized, _) | (GateState::Failed(_), _) => false,
            (_, GateState::Failed(_)) => true,
            (GateState::Start, GateState::Parsed)
            | (GateState::Parsed, GateState::Resolved)
            | (GateState::Resolved, GateState::Probed)
            | (GateState::Probed, GateState::Authorized) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Debug,
    Operator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub attempt_id: uuid::Uuid,
    pub channel: Channel,
    pub severity: Severity,
    pub stage: Stage,
    pub message: String,
}
