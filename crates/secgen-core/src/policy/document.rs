//! Read-only model of the hierarchical policy document.
//!
//! The source is XML: `<policy><enclaves><enclave><profiles><profile>` with
//! `<services reply|request="ALLOW|DENY">` and
//! `<topics subscribe|publish="ALLOW|DENY">` groups under each profile.
//! Parsing is strict about structure (root element, required attributes,
//! verdict values) and makes no judgement about whether the policy is
//! sensible or satisfiable.

use roxmltree::{Document, Node};

use crate::error::{Result, SecGenError};

/// Permission verdict carried by a declaration group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny,
}

/// Direction of a service declaration relative to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceDirection {
    /// The node serves the request (queryable side).
    Reply,
    /// The node issues the request (client side).
    Request,
}

/// Direction of a topic declaration relative to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicDirection {
    Subscribe,
    Publish,
}

/// One `<service>` entry. The name may start with the private-name marker
/// `~`, resolved against the owning node during permission extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDeclaration {
    pub name: String,
    pub direction: ServiceDirection,
    pub verdict: Verdict,
}

/// One `<topic>` entry. Topic names are used as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDeclaration {
    pub name: String,
    pub direction: TopicDirection,
    pub verdict: Verdict,
}

/// One `<profile>`: a node name plus its declared services and topics.
#[derive(Debug, Clone)]
pub struct Profile {
    pub node_name: String,
    pub services: Vec<ServiceDeclaration>,
    pub topics: Vec<TopicDeclaration>,
}

/// One `<enclave>`: a named grouping of profiles. No cross-enclave
/// relationships exist.
#[derive(Debug, Clone)]
pub struct Enclave {
    pub name: String,
    pub profiles: Vec<Profile>,
}

/// Ownership root of the parsed policy. Immutable for the duration of a
/// compilation run; may be traversed any number of times.
#[derive(Debug, Clone)]
pub struct PolicyDocument {
    pub enclaves: Vec<Enclave>,
}

impl PolicyDocument {
    /// Parse a policy document from its XML source.
    pub fn parse(source: &str) -> Result<Self> {
        let doc = Document::parse(source)
            .map_err(|e| SecGenError::MalformedPolicy(format!("not well-formed xml: {e}")))?;

        let root = doc.root_element();
        if root.tag_name().name() != "policy" {
            return Err(SecGenError::MalformedPolicy(format!(
                "expected root element 'policy', found '{}'",
                root.tag_name().name()
            )));
        }

        let mut enclaves = Vec::new();
        for enclaves_el in elements_named(root, "enclaves") {
            for enclave_el in elements_named(enclaves_el, "enclave") {
                enclaves.push(parse_enclave(enclave_el)?);
            }
        }

        Ok(Self { enclaves })
    }
}

fn elements_named<'a>(parent: Node<'a, 'a>, name: &'a str) -> impl Iterator<Item = Node<'a, 'a>> {
    parent.children().filter(move |n| n.has_tag_name(name))
}

fn parse_enclave(el: Node) -> Result<Enclave> {
    // The enclave name only serves error reporting; neither generator keys
    // any output on it.
    let name = el.attribute("path").unwrap_or("/").to_string();

    let mut profiles = Vec::new();
    for profiles_el in elements_named(el, "profiles") {
        for profile_el in elements_named(profiles_el, "profile") {
            profiles.push(parse_profile(profile_el)?);
        }
    }

    Ok(Enclave { name, profiles })
}

fn parse_profile(el: Node) -> Result<Profile> {
    let node_name = el.attribute("node").ok_or_else(|| {
        SecGenError::MalformedPolicy("profile element is missing the 'node' attribute".into())
    })?;
    if node_name.is_empty() {
        return Err(SecGenError::MalformedPolicy(
            "profile 'node' attribute is empty".into(),
        ));
    }

    let mut services = Vec::new();
    let mut topics = Vec::new();
    for group in el.children().filter(Node::is_element) {
        match group.tag_name().name() {
            "services" => {
                let (direction, verdict) = service_group_header(group)?;
                for decl in elements_named(group, "service") {
                    services.push(ServiceDeclaration {
                        name: element_text(decl),
                        direction,
                        verdict,
                    });
                }
            }
            "topics" => {
                let (direction, verdict) = topic_group_header(group)?;
                for decl in elements_named(group, "topic") {
                    topics.push(TopicDeclaration {
                        name: element_text(decl),
                        direction,
                        verdict,
                    });
                }
            }
            // Unknown groups carry nothing this compiler consumes.
            _ => {}
        }
    }

    Ok(Profile {
        node_name: node_name.to_string(),
        services,
        topics,
    })
}

fn element_text(el: Node) -> String {
    el.text().unwrap_or("").trim().to_string()
}

fn service_group_header(el: Node) -> Result<(ServiceDirection, Verdict)> {
    if let Some(raw) = el.attribute("reply") {
        Ok((ServiceDirection::Reply, parse_verdict(raw)?))
    } else if let Some(raw) = el.attribute("request") {
        Ok((ServiceDirection::Request, parse_verdict(raw)?))
    } else {
        Err(SecGenError::MalformedPolicy(
            "services element carries neither a 'reply' nor a 'request' attribute".into(),
        ))
    }
}

fn topic_group_header(el: Node) -> Result<(TopicDirection, Verdict)> {
    if let Some(raw) = el.attribute("subscribe") {
        Ok((TopicDirection::Subscribe, parse_verdict(raw)?))
    } else if let Some(raw) = el.attribute("publish") {
        Ok((TopicDirection::Publish, parse_verdict(raw)?))
    } else {
        Err(SecGenError::MalformedPolicy(
            "topics element carries neither a 'subscribe' nor a 'publish' attribute".into(),
        ))
    }
}

fn parse_verdict(raw: &str) -> Result<Verdict> {
    match raw {
        "ALLOW" => Ok(Verdict::Allow),
        "DENY" => Ok(Verdict::Deny),
        other => Err(SecGenError::MalformedPolicy(format!(
            "unknown permission verdict '{other}' (expected ALLOW or DENY)"
        ))),
    }
}
