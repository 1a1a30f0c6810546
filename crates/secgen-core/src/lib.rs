//! secgen core: policy document model, permission extraction, and
//! access-control rule synthesis.
//!
//! This crate compiles a hierarchical access-control policy (enclaves →
//! profiles → service/topic declarations) into the flat rule, subject, and
//! policy-binding model consumed by the Zenoh access-control layer. It
//! intentionally performs no file io so it can be driven from the generator
//! binary, from other front ends, and from tests alike.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `SecGenError`/`Result` so a bad policy
//! document degrades into a reported error, never a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod acl;
pub mod error;
pub mod policy;

/// Shared result type.
pub use error::{Result, SecGenError};
