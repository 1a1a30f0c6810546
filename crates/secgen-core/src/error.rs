//! Shared error type across secgen crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, SecGenError>;

/// Unified error type used by the core compiler and the generator binary.
#[derive(Debug, Error)]
pub enum SecGenError {
    /// The policy document cannot be parsed as the expected structure
    /// (non-well-formed markup, wrong root element, missing required
    /// attributes). Aborts the whole run.
    #[error("malformed policy: {0}")]
    MalformedPolicy(String),

    /// A declaration inside an otherwise well-formed profile is unusable.
    /// Aborts that profile only; the run continues.
    #[error("invalid declaration in enclave '{enclave}', profile '{profile}': {detail}")]
    InvalidDeclaration {
        enclave: String,
        profile: String,
        detail: String,
    },

    /// The base configuration document is unreadable, unparsable, or
    /// structurally unfit for key insertion.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Writing an output document failed. Fatal for that profile; the run
    /// continues with the remaining profiles.
    #[error("sink failure for {path}: {source}")]
    SinkFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SecGenError {
    /// Whether this failure aborts the whole run rather than one profile.
    pub fn aborts_run(&self) -> bool {
        matches!(
            self,
            SecGenError::MalformedPolicy(_) | SecGenError::InvalidConfig(_)
        )
    }
}
