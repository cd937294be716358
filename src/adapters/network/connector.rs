use std::io;

use crate::domain::ConnectionAuthorization;
use crate::ports::ConnectorPort;
use async_trait::async_trait;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::info;

/// Connector handing out a line-buffered raw TCP stream.
///
/// It only opens the socket; whatever protocol the scheme implies is up to
/// the reader on the other end.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl TcpConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConnectorPort for TcpConnector {
    type Stream = BufReader<TcpStream>;

    async fn connect(&self, authorization: &ConnectionAuthorization) -> io::Result<Self::Stream> {
        let address = authorization.address();
        let stream = timeout(
            authorization.requested_timeout(),
            TcpStream::connect((address.host(), address.port())),
        )
        .await
        .map_err(|_| {
            io::Error::new(
                io::ErrorKind::TimedOut,
                format!("connection to {} timed out", address.raw()),
            )
        })??;
        stream.set_nodelay(true)?;

        info!(
            "Opened {} (baudrate {}, timeout {:?})",
            address.raw(),
            authorization.baudrate(),
            authorization.requested_timeout()
        );
        Ok(BufReader::new(stream))
    }
}
