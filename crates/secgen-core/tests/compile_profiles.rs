//! End-to-end compilation over inline policy documents.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use secgen_core::acl::{compile_profile, MessageKind, LIVELINESS_RULE_ID};
use secgen_core::policy::PolicyDocument;
use secgen_core::SecGenError;

const TALKER_LISTENER: &str = r#"
<policy version="0.2.0">
  <enclaves>
    <enclave path="/talker_listener">
      <profiles>
        <profile node="talker">
          <topics publish="ALLOW">
            <topic>chatter</topic>
          </topics>
        </profile>
        <profile node="listener">
          <topics subscribe="ALLOW">
            <topic>chatter</topic>
          </topics>
        </profile>
      </profiles>
    </enclave>
  </enclaves>
</policy>
"#;

const CONFIGURATOR: &str = r#"
<policy version="0.2.0">
  <enclaves>
    <enclave path="/config">
      <profiles>
        <profile node="configurator">
          <services reply="ALLOW">
            <service>~set_param</service>
          </services>
        </profile>
      </profiles>
    </enclave>
  </enclaves>
</policy>
"#;

#[test]
fn talker_profile_compiles_to_publication_rules() {
    let doc = PolicyDocument::parse(TALKER_LISTENER).unwrap();
    let enclave = &doc.enclaves[0];
    let talker = compile_profile(&enclave.name, &enclave.profiles[0], 0).unwrap();

    let ids: Vec<&str> = talker.rules.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "outgoing_publications",
            "incoming_subscriptions",
            LIVELINESS_RULE_ID,
        ]
    );
    assert_eq!(talker.rules[0].key_exprs, vec!["0/chatter/**"]);
    assert_eq!(talker.rules[1].key_exprs, vec!["0/chatter/**"]);
    assert!(!talker.rules[2].messages.contains(&MessageKind::Reply));

    assert_eq!(talker.subjects[0].id, "router");
    assert_eq!(talker.subjects[1].id, "talker");
    assert_eq!(talker.policies[0].rules, vec![LIVELINESS_RULE_ID]);
    assert_eq!(talker.policies[0].subjects, vec!["router"]);
    assert_eq!(talker.policies[1].rules, ids);
    assert_eq!(talker.policies[1].subjects, vec!["talker"]);
}

#[test]
fn listener_profile_compiles_to_subscription_rules() {
    let doc = PolicyDocument::parse(TALKER_LISTENER).unwrap();
    let enclave = &doc.enclaves[0];
    let listener = compile_profile(&enclave.name, &enclave.profiles[1], 0).unwrap();

    let ids: Vec<&str> = listener.rules.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "outgoing_subscriptions",
            "incoming_publications",
            LIVELINESS_RULE_ID,
        ]
    );
}

#[test]
fn private_service_name_resolves_against_node() {
    let doc = PolicyDocument::parse(CONFIGURATOR).unwrap();
    let enclave = &doc.enclaves[0];
    let compiled = compile_profile(&enclave.name, &enclave.profiles[0], 0).unwrap();

    let incoming = &compiled.rules[0];
    let outgoing = &compiled.rules[1];
    assert_eq!(incoming.id, "incoming_queries");
    assert_eq!(outgoing.id, "outgoing_queryables_replies");
    assert_eq!(incoming.key_exprs, vec!["0/configurator/set_param/**"]);
    assert_eq!(outgoing.key_exprs, vec!["0/configurator/set_param/**"]);

    let liveliness = compiled.rules.last().unwrap();
    assert!(liveliness.messages.contains(&MessageKind::Reply));
}

#[test]
fn declaration_free_profile_gets_bare_liveliness() {
    let src = r#"
<policy>
  <enclaves><enclave><profiles>
    <profile node="idle"></profile>
  </profiles></enclave></enclaves>
</policy>
"#;
    let doc = PolicyDocument::parse(src).unwrap();
    let compiled = compile_profile("/", &doc.enclaves[0].profiles[0], 0).unwrap();

    assert_eq!(compiled.rules.len(), 1);
    assert_eq!(compiled.rules[0].id, LIVELINESS_RULE_ID);
    assert!(!compiled.rules[0].messages.contains(&MessageKind::Reply));
}

#[test]
fn empty_declaration_aborts_only_that_profile() {
    let src = r#"
<policy>
  <enclaves><enclave path="/e"><profiles>
    <profile node="broken">
      <topics publish="ALLOW"><topic></topic></topics>
    </profile>
    <profile node="fine">
      <topics publish="ALLOW"><topic>chatter</topic></topics>
    </profile>
  </profiles></enclave></enclaves>
</policy>
"#;
    let doc = PolicyDocument::parse(src).unwrap();
    let enclave = &doc.enclaves[0];

    let err = compile_profile(&enclave.name, &enclave.profiles[0], 0).expect_err("must fail");
    assert!(matches!(err, SecGenError::InvalidDeclaration { .. }));
    assert!(!err.aborts_run());

    let ok = compile_profile(&enclave.name, &enclave.profiles[1], 0).unwrap();
    assert_eq!(ok.node_name, "fine");
}

#[test]
fn identical_input_serializes_identically() {
    let doc = PolicyDocument::parse(TALKER_LISTENER).unwrap();
    let enclave = &doc.enclaves[0];

    let first = compile_profile(&enclave.name, &enclave.profiles[0], 0).unwrap();
    let second = compile_profile(&enclave.name, &enclave.profiles[0], 0).unwrap();

    let a = serde_json::to_string(&first.rules).unwrap();
    let b = serde_json::to_string(&second.rules).unwrap();
    assert_eq!(a, b);
}
