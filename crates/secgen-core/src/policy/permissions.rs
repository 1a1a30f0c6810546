//! Permission extraction: one profile → the eight-way permission partition.
//!
//! Declarations are partitioned by `(direction, verdict)` into sorted sets of
//! unique resolved names. Sets are membership-only; the sorted order is what
//! makes downstream rule synthesis reproducible across runs.

use std::collections::BTreeSet;

use crate::error::{Result, SecGenError};
use crate::policy::document::{Profile, ServiceDirection, TopicDirection, Verdict};

/// First character marking a service name as private to its node.
pub const PRIVATE_NAME_MARKER: char = '~';

/// The eight permission sets derived from one profile.
///
/// Deny sets are carried alongside the allow sets even though the rule
/// synthesizer never consumes them: the compiled output can only express
/// allow rules plus the global default-deny, so explicit denies have no
/// per-key representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    pub reply_allow: BTreeSet<String>,
    pub reply_deny: BTreeSet<String>,
    pub request_allow: BTreeSet<String>,
    pub request_deny: BTreeSet<String>,
    pub subscribe_allow: BTreeSet<String>,
    pub subscribe_deny: BTreeSet<String>,
    pub publish_allow: BTreeSet<String>,
    pub publish_deny: BTreeSet<String>,
}

impl PermissionSet {
    /// Partition one profile's declarations. `enclave` is carried only for
    /// error context.
    pub fn extract(enclave: &str, profile: &Profile) -> Result<Self> {
        let mut set = PermissionSet::default();

        for decl in &profile.services {
            if decl.name.is_empty() {
                return Err(invalid(enclave, profile, "service declaration with empty name"));
            }
            let resolved = resolve_service_name(&decl.name, &profile.node_name);
            let bucket = match (decl.direction, decl.verdict) {
                (ServiceDirection::Reply, Verdict::Allow) => &mut set.reply_allow,
                (ServiceDirection::Reply, Verdict::Deny) => &mut set.reply_deny,
                (ServiceDirection::Request, Verdict::Allow) => &mut set.request_allow,
                (ServiceDirection::Request, Verdict::Deny) => &mut set.request_deny,
            };
            bucket.insert(resolved);
        }

        for decl in &profile.topics {
            if decl.name.is_empty() {
                return Err(invalid(enclave, profile, "topic declaration with empty name"));
            }
            let bucket = match (decl.direction, decl.verdict) {
                (TopicDirection::Subscribe, Verdict::Allow) => &mut set.subscribe_allow,
                (TopicDirection::Subscribe, Verdict::Deny) => &mut set.subscribe_deny,
                (TopicDirection::Publish, Verdict::Allow) => &mut set.publish_allow,
                (TopicDirection::Publish, Verdict::Deny) => &mut set.publish_deny,
            };
            bucket.insert(decl.name.clone());
        }

        Ok(set)
    }

    /// Whether any service permission was granted. Drives the `reply`
    /// message in the liveliness rule.
    pub fn has_service_allow(&self) -> bool {
        !self.reply_allow.is_empty() || !self.request_allow.is_empty()
    }

    /// Total number of explicit DENY names (all four deny sets).
    pub fn deny_count(&self) -> usize {
        self.reply_deny.len()
            + self.request_deny.len()
            + self.subscribe_deny.len()
            + self.publish_deny.len()
    }
}

fn invalid(enclave: &str, profile: &Profile, detail: &str) -> SecGenError {
    SecGenError::InvalidDeclaration {
        enclave: enclave.to_string(),
        profile: profile.node_name.clone(),
        detail: detail.to_string(),
    }
}

/// Resolve the private-name marker against the owning node.
///
/// `~foo` and `~/foo` both denote `foo` under the node's namespace, so
/// `~set_param` on node `configurator` resolves to `configurator/set_param`.
/// Names without the marker pass through unchanged; topics never go through
/// this.
pub fn resolve_service_name(name: &str, node_name: &str) -> String {
    match name.strip_prefix(PRIVATE_NAME_MARKER) {
        Some(rest) => {
            let rest = rest.strip_prefix('/').unwrap_or(rest);
            if rest.is_empty() {
                node_name.to_string()
            } else {
                format!("{node_name}/{rest}")
            }
        }
        None => name.to_string(),
    }
}
