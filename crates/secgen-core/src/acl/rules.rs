//! Rule synthesis: permission sets → ordered access-control rules.
//!
//! Each of the seven data rules is an independent predicate over its own
//! permission set; none is coupled to the state of any other set. The
//! liveliness rule is always appended last. Key-expression lists materialize
//! from the sorted sets, so identical input yields byte-identical output.

use serde::Serialize;

use crate::policy::permissions::PermissionSet;

/// Message kinds the access-control layer can gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Put,
    DeclareSubscriber,
    Query,
    Reply,
    DeclareQueryable,
    LivelinessToken,
    LivelinessQuery,
    DeclareLivelinessSubscriber,
}

/// Traffic direction relative to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Ingress,
    Egress,
}

/// Rule verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Allow,
    Deny,
}

/// One access-control rule as it appears in the output document.
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    pub id: String,
    pub messages: Vec<MessageKind>,
    pub flows: Vec<Flow>,
    pub permission: Permission,
    pub key_exprs: Vec<String>,
}

/// Id of the liveliness rule appended to every profile's output.
pub const LIVELINESS_RULE_ID: &str = "liveliness_tokens";

fn allow_rule(
    id: &str,
    messages: Vec<MessageKind>,
    flow: Flow,
    names: impl IntoIterator<Item = impl AsRef<str>>,
    domain_id: u16,
) -> Rule {
    Rule {
        id: id.to_string(),
        messages,
        flows: vec![flow],
        permission: Permission::Allow,
        key_exprs: names
            .into_iter()
            .map(|n| format!("{domain_id}/{}/**", n.as_ref()))
            .collect(),
    }
}

/// Convert the permission sets into the ordered rule list.
///
/// Explicit DENY names have no per-key representation in the output (which
/// only carries allow rules over a default-deny) and are dropped here, with
/// a warning so the drop is never silent.
pub fn synthesize_rules(perms: &PermissionSet, domain_id: u16) -> Vec<Rule> {
    let mut rules = Vec::new();

    if !perms.reply_allow.is_empty() {
        rules.push(allow_rule(
            "incoming_queries",
            vec![MessageKind::Query],
            Flow::Ingress,
            &perms.reply_allow,
            domain_id,
        ));
        rules.push(allow_rule(
            "outgoing_queryables_replies",
            vec![MessageKind::DeclareQueryable, MessageKind::Reply],
            Flow::Egress,
            &perms.reply_allow,
            domain_id,
        ));
    }

    if !perms.request_allow.is_empty() {
        rules.push(allow_rule(
            "outgoing_queries",
            vec![MessageKind::Query],
            Flow::Egress,
            &perms.request_allow,
            domain_id,
        ));
    }

    if !perms.publish_allow.is_empty() {
        rules.push(allow_rule(
            "outgoing_publications",
            vec![MessageKind::Put],
            Flow::Egress,
            &perms.publish_allow,
            domain_id,
        ));
    }

    if !perms.subscribe_allow.is_empty() {
        rules.push(allow_rule(
            "outgoing_subscriptions",
            vec![MessageKind::DeclareSubscriber],
            Flow::Egress,
            &perms.subscribe_allow,
            domain_id,
        ));
    }

    if !perms.publish_allow.is_empty() {
        rules.push(allow_rule(
            "incoming_subscriptions",
            vec![MessageKind::DeclareSubscriber],
            Flow::Ingress,
            &perms.publish_allow,
            domain_id,
        ));
    }

    if !perms.subscribe_allow.is_empty() {
        rules.push(allow_rule(
            "incoming_publications",
            vec![MessageKind::Put],
            Flow::Ingress,
            &perms.subscribe_allow,
            domain_id,
        ));
    }

    let dropped = perms.deny_count();
    if dropped > 0 {
        tracing::warn!(
            dropped,
            "explicit DENY declarations have no rule representation; covered by default deny"
        );
    }

    rules.push(liveliness_rule(perms.has_service_allow(), domain_id));
    rules
}

/// The always-present liveliness rule. `reply` joins its message set exactly
/// when some service permission exists.
fn liveliness_rule(has_service_allow: bool, domain_id: u16) -> Rule {
    let mut messages = vec![
        MessageKind::LivelinessToken,
        MessageKind::LivelinessQuery,
        MessageKind::DeclareLivelinessSubscriber,
    ];
    if has_service_allow {
        messages.push(MessageKind::Reply);
    }

    Rule {
        id: LIVELINESS_RULE_ID.to_string(),
        messages,
        flows: vec![Flow::Ingress, Flow::Egress],
        permission: Permission::Allow,
        key_exprs: vec![format!("@ros2_lv/{domain_id}/**")],
    }
}
