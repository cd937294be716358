use crate::domain::{DnsError, ResolvedAddress, TimeoutBudget};
use crate::ports::ResolverPort;
use async_trait::async_trait;
use log::debug;
use tokio::net::lookup_host;
use tokio::time::timeout;

/// Resolver backed by the operating system (`getaddrinfo` through tokio)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResolverPort for SystemResolver {
    async fn resolve(&self, host: &str, budget: &TimeoutBudget) -> Result<ResolvedAddress, DnsError> {
        let limit = budget.effective_duration();

        // The port is irrelevant here, the prober pairs the address with the real one.
        match timeout(limit, lookup_host((host, 0))).await {
            Ok(Ok(mut addrs)) => match addrs.next() {
                Some(addr) => {
                    debug!("{} resolved to {}", host, addr.ip());
                    Ok(ResolvedAddress::new(host, addr.ip()))
                }
                None => Err(DnsError::new(format!("no address found for {}", host))),
            },
            Ok(Err(e)) => {
                debug!("Lookup of {} failed: {}", host, e);
                Err(DnsError::new(e.to_string()))
            }
            Err(_) => {
                debug!("Lookup of {} did not finish within {:?}", host, limit);
                Err(DnsError::new(format!(
                    "resolution timed out after {}s",
                    budget.effective_secs()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    #[tokio::test]
    async fn test_ip_literals_resolve_to_themselves() {
        let budget = TimeoutBudget::new(2.0, 5.0).unwrap();

        let resolved = SystemResolver::new().resolve("127.0.0.1", &budget).await.unwrap();
        assert_eq!(resolved.hostname, "127.0.0.1");
        assert_eq!(resolved.ip_address, IpAddr::V4(Ipv4Addr::LOCALHOST));

        let resolved = SystemResolver::new().resolve("::1", &budget).await.unwrap();
        assert_eq!(resolved.ip_address, IpAddr::V6(Ipv6Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_reserved_invalid_tld_fails() {
        let budget = TimeoutBudget::new(3.0, 5.0).unwrap();

        let err = SystemResolver::new()
            .resolve("printer.preflight-test.invalid", &budget)
            .await
            .unwrap_err();
        assert!(!err.reason.is_empty());
    }
}
