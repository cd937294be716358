mod connector;
mod prober;
mod resolver;

pub use connector::TcpConnector;
pub use prober::{probe_connect, TcpProber};
pub use resolver::SystemResolver;
