pub mod connector;
pub mod diagnostics;
pub mod prober;
pub mod resolver;

pub use connector::ConnectorPort;
pub use diagnostics::DiagnosticSink;
pub use prober::ProberPort;
pub use resolver::ResolverPort;
