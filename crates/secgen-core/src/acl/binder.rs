//! Subjects, policy bindings, and the per-profile compilation pipeline.

use serde::Serialize;

use crate::acl::rules::{synthesize_rules, Rule, LIVELINESS_RULE_ID};
use crate::error::Result;
use crate::policy::document::Profile;
use crate::policy::permissions::PermissionSet;

/// Identity a policy binding attaches to.
#[derive(Debug, Clone, Serialize)]
pub struct Subject {
    pub id: String,
}

/// Grants a set of rule ids to a set of subjects.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyBinding {
    pub rules: Vec<String>,
    pub subjects: Vec<String>,
}

/// Subject id of the infrastructure router.
pub const ROUTER_SUBJECT: &str = "router";

/// Everything the sink needs to emit one profile's configuration.
#[derive(Debug, Clone)]
pub struct CompiledProfile {
    pub node_name: String,
    pub rules: Vec<Rule>,
    pub subjects: Vec<Subject>,
    pub policies: Vec<PolicyBinding>,
}

/// Produce the subject list and the two policy bindings for one profile.
///
/// The router is granted only the liveliness rule; the node is granted every
/// rule emitted for the profile, in emission order.
pub fn bind(node_name: &str, rules: &[Rule]) -> (Vec<Subject>, Vec<PolicyBinding>) {
    let subjects = vec![
        Subject {
            id: ROUTER_SUBJECT.to_string(),
        },
        Subject {
            id: node_name.to_string(),
        },
    ];

    let policies = vec![
        PolicyBinding {
            rules: vec![LIVELINESS_RULE_ID.to_string()],
            subjects: vec![ROUTER_SUBJECT.to_string()],
        },
        PolicyBinding {
            rules: rules.iter().map(|r| r.id.clone()).collect(),
            subjects: vec![node_name.to_string()],
        },
    ];

    (subjects, policies)
}

/// Run extractor → synthesizer → binder for one profile. Profiles are
/// independent; nothing is shared across calls.
pub fn compile_profile(enclave: &str, profile: &Profile, domain_id: u16) -> Result<CompiledProfile> {
    let perms = PermissionSet::extract(enclave, profile)?;
    let rules = synthesize_rules(&perms, domain_id);
    let (subjects, policies) = bind(&profile.node_name, &rules);

    Ok(CompiledProfile {
        node_name: profile.node_name.clone(),
        rules,
        subjects,
        policies,
    })
}
