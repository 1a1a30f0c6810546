//! Policy source model (document + derived permissions).
//!
//! - `document`: read-only view over the hierarchical policy XML, exposing
//!   enclaves → profiles → service/topic declarations.
//! - `permissions`: the eight-way permission partition derived from one
//!   profile, with private-name resolution.

pub mod document;
pub mod permissions;

pub use document::{
    Enclave, PolicyDocument, Profile, ServiceDeclaration, ServiceDirection, TopicDeclaration,
    TopicDirection, Verdict,
};
pub use permissions::PermissionSet;
