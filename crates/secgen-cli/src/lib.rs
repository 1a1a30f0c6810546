//! secgen generator library entry.
//!
//! This crate wires the core policy compiler to its outputs: the config sink
//! (per-node access-control documents), the transport template generator,
//! and the run orchestration consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod compile;
pub mod sink;
pub mod transport;
