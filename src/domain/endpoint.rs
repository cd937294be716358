use url::{Host, Url};

use super::{Address, ParseError};

pub const SCHEME_DELIMITER: &str = "://";

/// Whether `raw` is a network address at all (as opposed to a local device path).
pub fn is_network_address(raw: &str) -> bool {
    raw.contains(SCHEME_DELIMITER)
}

/// Parse a `scheme://host:port` endpoint.
///
/// Strings without the scheme delimiter yield [`ParseError::NotNetworkAddress`]
/// so the caller can fall back to treating them as local identifiers.
pub fn parse(raw: &str) -> Result<Address, ParseError> {
    if !is_network_address(raw) {
        return Err(ParseError::NotNetworkAddress);
    }

    let invalid = || ParseError::InvalidFormat(raw.to_string());
    let url = Url::parse(raw).map_err(|_| invalid())?;

    let host = match url.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => ip.to_string(),
        None => return Err(invalid()),
    };
    if host.is_empty() {
        return Err(invalid());
    }

    // `Url::port` hides an explicit port equal to the scheme default.
    let port = match url.port() {
        Some(port) => port,
        None if has_explicit_port(raw) => url.port_or_known_default().ok_or_else(invalid)?,
        None => return Err(invalid()),
    };
    if port == 0 {
        return Err(invalid());
    }

    Ok(Address::new(raw.to_string(), url.scheme().to_string(), host, port))
}

/// Whether the authority of `raw` ends in `:digits`.
fn has_explicit_port(raw: &str) -> bool {
    let Some((_, rest)) = raw.split_once(SCHEME_DELIMITER) else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let after_host = match host_port.strip_prefix('[') {
        Some(bracketed) => match bracketed.split_once(']') {
            Some((_, after)) => after,
            None => return false,
        },
        None => host_port.find(':').map_or("", |idx| &host_port[idx..]),
    };
    after_host
        .strip_prefix(':')
        .map_or(false, |digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Keep only the configured entries that are network addresses, in order, duplicates included.
pub fn list_candidates<S: AsRef<str>>(configured: &[S]) -> Vec<String> {
    configured
        .iter()
        .map(|raw| raw.as_ref())
        .filter(|raw| is_network_address(raw))
        .map(str::to_string)
        .collect()
}
