#![cfg(test)]
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;

pub use fixtures::{closed_port, tcp_prober, BlackholeProber, CountingProber, GateFixture, StaticResolver};
