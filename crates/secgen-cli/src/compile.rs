//! Run orchestration: policy document → one access-control config per
//! profile.
//!
//! Profiles are compiled independently. A malformed policy or base config
//! aborts the run; an invalid declaration or a write failure skips that
//! profile and the run continues, with every skip surfaced in the report.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use secgen_core::acl::{compile_profile, CompiledProfile};
use secgen_core::error::{Result, SecGenError};
use secgen_core::policy::PolicyDocument;

use crate::sink::{self, ConfigDocument};

/// File extension of every generated configuration document.
pub const CONFIG_FILE_EXTENSION: &str = "json5";

/// Options for one compilation run.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Policy document (XML).
    pub policy_path: PathBuf,
    /// Optional base Zenoh config merged into every output.
    pub base_config_path: Option<PathBuf>,
    /// Directory receiving `<node_name>.json5` files.
    pub out_dir: PathBuf,
    /// Leading key-expression segment.
    pub domain_id: u16,
}

/// One profile that failed. The run continues past these.
#[derive(Debug)]
pub struct ProfileFailure {
    pub enclave: String,
    pub node_name: String,
    pub error: SecGenError,
}

/// Outcome of a full run.
#[derive(Debug, Default)]
pub struct CompileReport {
    /// Paths written (or rewritten) this run.
    pub written: Vec<PathBuf>,
    /// Paths whose existing content already matched.
    pub unchanged: Vec<PathBuf>,
    pub failures: Vec<ProfileFailure>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compile every profile of every enclave and write the outputs.
pub fn run(opts: &CompileOptions) -> Result<CompileReport> {
    let source = fs::read_to_string(&opts.policy_path).map_err(|e| {
        SecGenError::MalformedPolicy(format!(
            "cannot read policy file {}: {e}",
            opts.policy_path.display()
        ))
    })?;
    let document = PolicyDocument::parse(&source)?;

    let base = match &opts.base_config_path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|e| {
                SecGenError::InvalidConfig(format!(
                    "cannot read config file {}: {e}",
                    path.display()
                ))
            })?;
            Some(ConfigDocument::from_json5_str(&raw)?)
        }
        None => None,
    };

    let mut report = CompileReport::default();
    for enclave in &document.enclaves {
        for profile in &enclave.profiles {
            let compiled = match compile_profile(&enclave.name, profile, opts.domain_id) {
                Ok(compiled) => compiled,
                Err(error) => {
                    tracing::error!(
                        enclave = %enclave.name,
                        node = %profile.node_name,
                        %error,
                        "skipping profile"
                    );
                    report.failures.push(ProfileFailure {
                        enclave: enclave.name.clone(),
                        node_name: profile.node_name.clone(),
                        error,
                    });
                    continue;
                }
            };

            match write_profile(&compiled, base.clone(), &opts.out_dir) {
                Ok((path, true)) => {
                    tracing::info!(path = %path.display(), node = %compiled.node_name, "wrote access-control config");
                    report.written.push(path);
                }
                Ok((path, false)) => {
                    tracing::debug!(path = %path.display(), "existing config identical, write skipped");
                    report.unchanged.push(path);
                }
                Err(error) => {
                    tracing::error!(
                        enclave = %enclave.name,
                        node = %compiled.node_name,
                        %error,
                        "failed to write profile output"
                    );
                    report.failures.push(ProfileFailure {
                        enclave: enclave.name.clone(),
                        node_name: compiled.node_name.clone(),
                        error,
                    });
                }
            }
        }
    }

    Ok(report)
}

fn write_profile(
    compiled: &CompiledProfile,
    base: Option<ConfigDocument>,
    out_dir: &Path,
) -> Result<(PathBuf, bool)> {
    let mut doc = base.unwrap_or_default();
    doc.insert("access_control/enabled", json!(true))?;
    doc.insert("access_control/default_permission", json!("deny"))?;
    doc.insert("access_control/rules", to_value(&compiled.rules)?)?;
    doc.insert("access_control/policies", to_value(&compiled.policies)?)?;
    doc.insert("access_control/subjects", to_value(&compiled.subjects)?)?;

    let path = out_dir.join(format!("{}.{CONFIG_FILE_EXTENSION}", compiled.node_name));
    let changed = sink::write_if_changed(&path, &doc.to_config_string()?)?;
    Ok((path, changed))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| SecGenError::InvalidConfig(format!("serialization failed: {e}")))
}
