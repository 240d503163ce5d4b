//! Error types for stacksync
//!
//! Uses `thiserror` for library errors. Exit codes distinguish validation
//! problems from provider rejections from internal failures.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stacksync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Main error type for stacksync operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// Invalid or missing session parameters, caught before any work starts
    #[error("invalid option: {0}")]
    Validation(String),

    /// Template could not be read or parsed
    #[error("failed to load template {path}: {message}")]
    TemplateLoad { path: PathBuf, message: String },

    /// Nested stack references form a cycle
    #[error("cyclic stack reference: {chain}")]
    CyclicReference { chain: String },

    /// The provider rejected a deploy or code update; message passed through verbatim
    #[error("{message}")]
    Provider {
        message: String,
        code: Option<String>,
    },

    /// Fingerprint store could not be read or written
    #[error("fingerprint store error: {0}")]
    Fingerprint(String),

    /// Another session holds the lock for this stack identity
    #[error("a sync for stack '{identity}' is already in progress")]
    SyncInProgress { identity: String },

    /// Code content for a resource could not be hashed
    #[error("failed to hash code for '{resource}': {message}")]
    CodeHash { resource: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Process exit code for this error.
    ///
    /// `2` for validation errors (matching clap's own usage errors),
    /// `1` for provider rejections, `3` for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::Validation(_) => 2,
            SyncError::Provider { .. } => 1,
            _ => 3,
        }
    }
}
