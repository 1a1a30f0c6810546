//! Zenoh configuration document: an opaque JSON object accepting structured
//! key/value insertions at slash-separated paths.
//!
//! Base configs are parsed as JSON5 (the Zenoh config dialect: comments,
//! single quotes, trailing commas). Output is pretty-printed JSON, which is
//! itself valid JSON5.

use serde_json::{Map, Value};

use secgen_core::error::{Result, SecGenError};

/// Mutable configuration object the compiler inserts into.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    root: Map<String, Value>,
}

impl ConfigDocument {
    /// Empty document (`{}`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a base configuration. The root must be an object.
    pub fn from_json5_str(source: &str) -> Result<Self> {
        let value: Value = json5::from_str(source)
            .map_err(|e| SecGenError::InvalidConfig(format!("invalid json5: {e}")))?;
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(SecGenError::InvalidConfig(format!(
                "config root must be an object, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Insert `value` at a slash-separated key path, creating intermediate
    /// objects as needed. Fails if an intermediate key exists and is not an
    /// object.
    pub fn insert(&mut self, path: &str, value: Value) -> Result<()> {
        let mut segments: Vec<&str> = path.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(SecGenError::InvalidConfig(format!(
                "empty segment in key path '{path}'"
            )));
        }
        // Non-empty: split always yields at least one segment and empty
        // segments were rejected above.
        let Some(leaf) = segments.pop() else {
            return Err(SecGenError::InvalidConfig("empty key path".into()));
        };

        let mut cursor = &mut self.root;
        for segment in segments {
            let entry = cursor
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            cursor = match entry {
                Value::Object(map) => map,
                _ => {
                    return Err(SecGenError::InvalidConfig(format!(
                        "key '{segment}' in path '{path}' is not an object"
                    )))
                }
            };
        }
        cursor.insert(leaf.to_string(), value);
        Ok(())
    }

    /// Serialize the document. Pretty JSON, `.json5`-compatible.
    pub fn to_config_string(&self) -> Result<String> {
        let mut rendered = serde_json::to_string_pretty(&Value::Object(self.root.clone()))
            .map_err(|e| SecGenError::InvalidConfig(format!("serialization failed: {e}")))?;
        rendered.push('\n');
        Ok(rendered)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
