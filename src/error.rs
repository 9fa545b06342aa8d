//! Error types for CSN loading and interop transformation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a CSN document or transforming it.
#[derive(Debug, Error)]
pub enum InteropError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid i18n bundle {path}: {message}")]
    InvalidBundle { path: PathBuf, message: String },

    // Document errors (exit code 2)
    #[error("document has no definitions")]
    MissingDefinitions,

    #[error("invalid definitions: expected object, got {actual}")]
    InvalidDefinitions { actual: String },
}

impl InteropError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            InteropError::FileNotFound { .. } | InteropError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            InteropError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}
