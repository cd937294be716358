use crate::domain::{DnsError, ResolvedAddress, TimeoutBudget};
use async_trait::async_trait;

/// Port for forward name resolution
#[async_trait]
pub trait ResolverPort: Send + Sync {
    /// Resolve `host` to its first address, giving up after the budget's effective timeout.
    ///
    /// Any failure, including running out of time, is reported as a [`DnsError`].
    async fn resolve(&self, host: &str, budget: &TimeoutBudget) -> Result<ResolvedAddress, DnsError>;
}
