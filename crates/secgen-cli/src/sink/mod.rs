//! Output sink: config document assembly + idempotent file writes.

pub mod document;

use std::fs;
use std::path::Path;

use secgen_core::error::{Result, SecGenError};

pub use document::ConfigDocument;

/// Write `content` to `path` unless an identical file already exists.
/// Returns whether the file was (re)written. Both output paths (per-node
/// access-control configs and transport configs) go through here.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    if let Ok(existing) = fs::read_to_string(path) {
        if existing == content {
            return Ok(false);
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| sink_failure(path, e))?;
        }
    }
    fs::write(path, content).map_err(|e| sink_failure(path, e))?;
    Ok(true)
}

fn sink_failure(path: &Path, source: std::io::Error) -> SecGenError {
    SecGenError::SinkFailure {
        path: path.display().to_string(),
        source,
    }
}
