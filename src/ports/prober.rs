use crate::domain::{ProbeOutcome, ResolvedAddress, TimeoutBudget};
use async_trait::async_trait;

/// Port for checking that a resolved endpoint accepts connections
#[async_trait]
pub trait ProberPort: Send + Sync {
    /// Open and immediately close a stream connection to `(target.ip_address, port)`.
    ///
    /// The probe connection is never handed out; it is released on every path
    /// before this returns.
    async fn probe(&self, target: &ResolvedAddress, port: u16, budget: &TimeoutBudget) -> ProbeOutcome;
}
