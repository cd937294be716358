use std::fmt;

/// Failure to turn a raw address string into an [`Address`](super::Address).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The string carries no `://` delimiter, so it is not ours to handle.
    NotNetworkAddress,
    InvalidFormat(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NotNetworkAddress => write!(f, "Not a network address"),
            ParseError::InvalidFormat(raw) => write!(f, "Invalid network address: {}", raw),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsError {
    pub reason: String,
}

impl DnsError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl fmt::Display for DnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name resolution failed: {}", self.reason)
    }
}

impl std::error::Error for DnsError {}

/// Terminal outcome of a gate attempt that did not end in authorization.
#[derive(Debug, Clone, PartialEq)]
pub enum GateError {
    NotNetworkAddress,
    InvalidFormat(String),
    InvalidTimeout(f64),
    DnsFailure(String),
    ConnectTimeout,
    ConnectionRefused,
    NetworkUnreachable(String),
    ProbeFailed(String),
    ConnectorFailure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateErrorKind {
    NotNetworkAddress,
    InvalidFormat,
    InvalidTimeout,
    DnsFailure,
    ConnectTimeout,
    ConnectionRefused,
    NetworkUnreachable,
    ProbeFailed,
    ConnectorFailure,
}

impl GateError {
    pub fn kind(&self) -> GateErrorKind {
        match self {
            GateError::NotNetworkAddress => GateErrorKind::NotNetworkAddress,
            GateError::InvalidFormat(_) => GateErrorKind::InvalidFormat,
            GateError::InvalidTimeout(_) => GateErrorKind::InvalidTimeout,
            GateError::DnsFailure(_) => GateErrorKind::DnsFailure,
            GateError::ConnectTimeout => GateErrorKind::ConnectTimeout,
            GateError::ConnectionRefused => GateErrorKind::ConnectionRefused,
            GateError::NetworkUnreachable(_) => GateErrorKind::NetworkUnreachable,
            GateError::ProbeFailed(_) => GateErrorKind::ProbeFailed,
            GateError::ConnectorFailure(_) => GateErrorKind::ConnectorFailure,
        }
    }

    /// `NotNetworkAddress` means "skip this candidate", every other variant is a real failure.
    pub fn is_failure(&self) -> bool {
        !matches!(self, GateError::NotNetworkAddress)
    }

    /// What the operator should look at, phrased per failure class.
    pub fn remedy(&self) -> &'static str {
        match self {
            GateError::NotNetworkAddress => "not a network address, nothing to check",
            GateError::InvalidFormat(_) => "check the address format (scheme://host:port)",
            GateError::InvalidTimeout(_) => "check the configured connection timeout",
            GateError::DnsFailure(_) => "DNS problem, check the hostname and the resolver configuration",
            GateError::ConnectTimeout => "timed out, check that the device is powered on and not overloaded",
            GateError::ConnectionRefused => "port closed, check the port number and that the device service is listening",
            GateError::NetworkUnreachable(_) => "host unreachable, check the host address and the network route to it",
            GateError::ProbeFailed(_) => "local socket error, check the permissions and network settings of this machine",
            GateError::ConnectorFailure(_) => "the device refused the session, check the connection settings",
        }
    }
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateError::NotNetworkAddress => write!(f, "Not a network address"),
            GateError::InvalidFormat(raw) => write!(f, "Invalid network address: {}", raw),
            GateError::InvalidTimeout(secs) => write!(f, "Invalid timeout: {}s", secs),
            GateError::DnsFailure(msg) => write!(f, "Name resolution failed: {}", msg),
            GateError::ConnectTimeout => write!(f, "Connection timed out"),
            GateError::ConnectionRefused => write!(f, "Connection refused"),
            GateError::NetworkUnreachable(msg) => write!(f, "Network unreachable: {}", msg),
            GateError::ProbeFailed(msg) => write!(f, "Probe failed: {}", msg),
            GateError::ConnectorFailure(msg) => write!(f, "Connector failed: {}", msg),
        }
    }
}

impl std::error::Error for GateError {}

impl From<ParseError> for GateError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::NotNetworkAddress => GateError::NotNetworkAddress,
            ParseError::InvalidFormat(raw) => GateError::InvalidFormat(raw),
        }
    }
}

impl From<DnsError> for GateError {
    fn from(err: DnsError) -> Self {
        GateError::DnsFailure(err.reason)
    }
}

pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_network_address_is_not_a_failure() {
        assert!(!GateError::NotNetworkAddress.is_failure());
        assert!(GateError::ConnectionRefused.is_failure());
        assert!(GateError::InvalidFormat("x://".into()).is_failure());
    }

    #[test]
    fn test_parse_error_conversion_keeps_raw_input() {
        let err: GateError = ParseError::InvalidFormat("tcp://:0".into()).into();
        assert_eq!(err, GateError::InvalidFormat("tcp://:0".into()));

        let err: GateError = ParseError::NotNetworkAddress.into();
        assert_eq!(err.kind(), GateErrorKind::NotNetworkAddress);
    }

    #[test]
    fn test_remedies_are_distinct_per_failure_class() {
        let remedies = [
            GateError::DnsFailure("nx".into()).remedy(),
            GateError::ConnectTimeout.remedy(),
            GateError::ConnectionRefused.remedy(),
            GateError::NetworkUnreachable("no route".into()).remedy(),
        ];
        for (i, a) in remedies.iter().enumerate() {
            for b in remedies.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
