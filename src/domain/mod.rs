pub mod classify;
pub mod endpoint;
pub mod errors;
pub mod models;
pub mod reporter;
pub mod service;

pub use errors::*;
pub use models::*;
pub use reporter::{DiagnosticReporter, StageEvent};
pub use service::ConnectionGate;
