mod memory;
mod tracing_sink;

pub use memory::MemorySink;
pub use tracing_sink::{TracingSink, DEBUG_TARGET, OPERATOR_TARGET};
