//! Preflight reachability checks for network-attached serial endpoints.
//!
//! ```text
//! raw address ──▶ parse ──▶ resolve ──▶ probe ──▶ ConnectionAuthorization ──▶ connector
//!                   │          │          │
//!                   └──────────┴──────────┴──▶ GateError (terminal, never retried)
//! ```
//!
//! The [`domain`] holds the gate and its state machine, [`ports`] the traits
//! it is wired with, and [`adapters`] the tokio-backed implementations.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;

pub use config::PreflightConfig;
pub use domain::{ConnectionAuthorization, ConnectionGate, GateError};
