//! Error types for storage-tier operations.

use thiserror::Error;

/// Errors that can occur during storage-tier operations.
///
/// Expected failure modes are values, not panics: backends map their
/// transport layer into this taxonomy and callers match on the variant.
/// Timeouts are always `Transport`, never `NotFound`.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// Object not found in the tier.
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Object already exists and the caller did not request upsert.
    #[error("Object already exists: {bucket}/{key} (upsert not requested)")]
    AlreadyExists { bucket: String, key: String },

    /// Access denied by the backing store.
    #[error("Access denied to {bucket}/{key}: {message}")]
    AccessDenied {
        bucket: String,
        key: String,
        message: String,
    },

    /// Network or timeout error talking to the backing API.
    #[error("Transport error: {message}")]
    Transport { message: String, retryable: bool },

    /// Local I/O error.
    #[error("I/O error for {path}: {message}")]
    Io { path: String, message: String },

    /// Invalid client configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl StorageError {
    /// Check if this error is worth retrying by the caller.
    ///
    /// Nothing is retried internally; this only classifies.
    pub fn is_retryable(&self) -> bool {
        match self {
            StorageError::Transport { retryable, .. } => *retryable,
            StorageError::NotFound { .. } => false,
            StorageError::AlreadyExists { .. } => false,
            StorageError::AccessDenied { .. } => false,
            StorageError::Io { .. } => false,
            StorageError::InvalidConfig { .. } => false,
        }
    }

    /// Create a `NotFound` error for the given location.
    pub fn not_found(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        StorageError::NotFound {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Create a `Transport` error with the given retryability.
    pub fn transport(message: impl Into<String>, retryable: bool) -> Self {
        StorageError::Transport {
            message: message.into(),
            retryable,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io {
            path: String::new(),
            message: err.to_string(),
        }
    }
}
