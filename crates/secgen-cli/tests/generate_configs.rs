//! End-to-end generation tests driving the library the way the binary does.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;
use std::path::Path;

use serde_json::Value;

use secgen_cli::compile::{run, CompileOptions};
use secgen_core::SecGenError;

const POLICY: &str = r#"
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
          <services request="ALLOW">
            <service>reset</service>
          </services>
        </profile>
      </profiles>
    </enclave>
  </enclaves>
</policy>
"#;

fn write_policy(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("policy.xml");
    fs::write(&path, content).unwrap();
    path
}

fn opts(policy: &Path, out_dir: &Path) -> CompileOptions {
    CompileOptions {
        policy_path: policy.to_path_buf(),
        base_config_path: None,
        out_dir: out_dir.to_path_buf(),
        domain_id: 0,
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn one_output_per_profile() {
    let dir = tempfile::tempdir().unwrap();
    let policy = write_policy(dir.path(), POLICY);

    let report = run(&opts(&policy, dir.path())).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.written.len(), 2);

    let talker = read_json(&dir.path().join("talker.json5"));
    assert_eq!(talker["access_control"]["enabled"], Value::Bool(true));
    assert_eq!(talker["access_control"]["default_permission"], "deny");

    let rules = talker["access_control"]["rules"].as_array().unwrap();
    let ids: Vec<&str> = rules.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        vec![
            "outgoing_publications",
            "incoming_subscriptions",
            "liveliness_tokens",
        ]
    );
    assert_eq!(rules[0]["key_exprs"][0], "0/chatter/**");

    // No service permission: liveliness carries no reply.
    let liveliness_messages = rules[2]["messages"].as_array().unwrap();
    assert!(!liveliness_messages.iter().any(|m| m == "reply"));

    let policies = talker["access_control"]["policies"].as_array().unwrap();
    assert_eq!(policies[0]["rules"][0], "liveliness_tokens");
    assert_eq!(policies[0]["subjects"][0], "router");
    assert_eq!(policies[1]["subjects"][0], "talker");

    let subjects = talker["access_control"]["subjects"].as_array().unwrap();
    assert_eq!(subjects[0]["id"], "router");
    assert_eq!(subjects[1]["id"], "talker");
}

#[test]
fn service_permission_adds_reply_to_liveliness() {
    let dir = tempfile::tempdir().unwrap();
    let policy = write_policy(dir.path(), POLICY);

    run(&opts(&policy, dir.path())).unwrap();

    let listener = read_json(&dir.path().join("listener.json5"));
    let rules = listener["access_control"]["rules"].as_array().unwrap();
    let liveliness = rules.last().unwrap();
    assert_eq!(liveliness["id"], "liveliness_tokens");
    assert!(liveliness["messages"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m == "reply"));
}

#[test]
fn rerun_on_unchanged_input_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let policy = write_policy(dir.path(), POLICY);

    let first = run(&opts(&policy, dir.path())).unwrap();
    assert_eq!(first.written.len(), 2);

    let before = fs::read_to_string(dir.path().join("talker.json5")).unwrap();
    let second = run(&opts(&policy, dir.path())).unwrap();
    assert!(second.written.is_empty());
    assert_eq!(second.unchanged.len(), 2);

    let after = fs::read_to_string(dir.path().join("talker.json5")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn base_config_is_merged_into_every_output() {
    let dir = tempfile::tempdir().unwrap();
    let policy = write_policy(dir.path(), POLICY);
    let base = dir.path().join("base.json5");
    fs::write(&base, "{ /* shared base */ mode: 'peer' }").unwrap();

    let mut options = opts(&policy, dir.path());
    options.base_config_path = Some(base);
    run(&options).unwrap();

    let talker = read_json(&dir.path().join("talker.json5"));
    assert_eq!(talker["mode"], "peer");
    assert_eq!(talker["access_control"]["enabled"], Value::Bool(true));
}

#[test]
fn domain_id_threads_into_output() {
    let dir = tempfile::tempdir().unwrap();
    let policy = write_policy(dir.path(), POLICY);

    let mut options = opts(&policy, dir.path());
    options.domain_id = 7;
    run(&options).unwrap();

    let talker = read_json(&dir.path().join("talker.json5"));
    let rules = talker["access_control"]["rules"].as_array().unwrap();
    assert_eq!(rules[0]["key_exprs"][0], "7/chatter/**");
    assert_eq!(rules.last().unwrap()["key_exprs"][0], "@ros2_lv/7/**");
}

#[test]
fn bad_profile_is_skipped_and_rest_still_generates() {
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
    let dir = tempfile::tempdir().unwrap();
    let policy = write_policy(dir.path(), src);

    let report = run(&opts(&policy, dir.path())).unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].node_name, "broken");
    assert!(matches!(
        report.failures[0].error,
        SecGenError::InvalidDeclaration { .. }
    ));

    assert_eq!(report.written.len(), 1);
    assert!(dir.path().join("fine.json5").exists());
    assert!(!dir.path().join("broken.json5").exists());
}

#[test]
fn malformed_policy_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let policy = write_policy(dir.path(), "<wat/>");

    let err = run(&opts(&policy, dir.path())).expect_err("must fail");
    assert!(matches!(err, SecGenError::MalformedPolicy(_)));
    assert!(err.aborts_run());
}

#[test]
fn missing_policy_file_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();

    let err = run(&opts(&dir.path().join("nope.xml"), dir.path())).expect_err("must fail");
    assert!(matches!(err, SecGenError::MalformedPolicy(_)));
}
