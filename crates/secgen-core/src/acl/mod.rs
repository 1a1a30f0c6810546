//! Access-control output model (rules + subjects + policy bindings).
//!
//! - `rules`: the rule wire model and the synthesizer turning permission
//!   sets into an ordered rule list.
//! - `binder`: subjects, policy bindings, and the per-profile pipeline
//!   composing extractor → synthesizer → binder.

pub mod binder;
pub mod rules;

pub use binder::{compile_profile, CompiledProfile, PolicyBinding, Subject, ROUTER_SUBJECT};
pub use rules::{synthesize_rules, Flow, MessageKind, Permission, Rule, LIVELINESS_RULE_ID};
