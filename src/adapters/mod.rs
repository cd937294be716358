pub mod diagnostics;
pub mod network;

pub use diagnostics::*;
pub use network::*;
