//! Shared error types for context loading.
//!
//! Every loading function in this crate returns a [`ContextError`] instead
//! of terminating the process. The one place allowed to exit is
//! [`get_context`](crate::context::get_context), which reports the error and
//! decides the process outcome.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the analyzer runtime context.
#[derive(Debug, Error)]
pub enum ContextError {
    /// A required configuration file is missing or empty
    #[error("No configuration file '{}' can be found or it is empty!", path.display())]
    MissingConfig { path: PathBuf },

    /// A configuration file exists but is malformed or lacks a required field
    #[error("Failed to parse configuration file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The package version metadata file is missing or empty
    #[error("Failed to load version metadata from '{}'", path.display())]
    MissingVersionFile { path: PathBuf },

    /// One or more analyzer override entries were rejected
    #[error("invalid analyzer binary override: {}", errors.join("; "))]
    InvalidOverride { errors: Vec<String> },

    /// Filesystem errors outside the missing-file contract
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, ContextError>;
