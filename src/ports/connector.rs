use crate::domain::ConnectionAuthorization;
use async_trait::async_trait;

/// Port for the real device connection, invoked once per successful authorization
#[async_trait]
pub trait ConnectorPort: Send + Sync {
    type Stream: Send;

    /// Open the session for `authorization.raw()` with the caller's uncapped timeout.
    async fn connect(&self, authorization: &ConnectionAuthorization) -> std::io::Result<Self::Stream>;
}
