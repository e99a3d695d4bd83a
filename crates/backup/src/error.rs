//! Error types for backup production and offsite transfer.

use thiserror::Error;

/// Errors producing a local backup artifact.
///
/// All of these are terminal for the run that hit them; the orchestrator
/// never retries a dump.
#[derive(Debug, Error, Clone)]
pub enum DumpError {
    /// No connection string was configured.
    #[error("Missing database connection string")]
    MissingConnectionString,

    /// The connection string could not be parsed.
    #[error("Invalid connection string: {message}")]
    InvalidConnectionString { message: String },

    /// The external dump tool failed to start or exited non-zero.
    #[error("{message}")]
    ToolInvocation { message: String },

    /// The external dump tool exceeded its time bound.
    #[error("Dump tool timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The tool reported success but the artifact is missing or empty.
    #[error("Dump produced no usable artifact at {path}")]
    EmptyArtifact { path: String },

    /// Local filesystem error.
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    /// The logical export document could not be assembled or serialized.
    #[error("Export serialization failed: {message}")]
    Serialization { message: String },

    /// The data-access layer failed while enumerating a logical table.
    #[error("Export of table {table} failed: {message}")]
    TableExport { table: String, message: String },
}

impl DumpError {
    /// Create an `Io` error from a path and `std::io::Error`.
    pub fn from_io(path: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Errors talking to the offsite drive API.
#[derive(Debug, Error, Clone)]
pub enum OffsiteError {
    /// Service-account grant could not be obtained.
    #[error("Offsite authentication failed: {message}")]
    Auth { message: String },

    /// Network or timeout error.
    #[error("Offsite transport error: {message}")]
    Transport { message: String, retryable: bool },

    /// The API answered with a non-success status.
    #[error("Offsite API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Remote object not found.
    #[error("Offsite object not found: {id}")]
    NotFound { id: String },

    /// Local filesystem error reading the artifact.
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },
}

impl OffsiteError {
    /// Check if this error is worth retrying by the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            OffsiteError::Transport { retryable, .. } => *retryable,
            OffsiteError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsite_retryability() {
        assert!(OffsiteError::Transport {
            message: "timeout".into(),
            retryable: true
        }
        .is_retryable());
        assert!(OffsiteError::Api {
            status: 503,
            message: "unavailable".into()
        }
        .is_retryable());
        assert!(!OffsiteError::Api {
            status: 404,
            message: "gone".into()
        }
        .is_retryable());
        assert!(!OffsiteError::Auth {
            message: "bad key".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_tool_invocation_message_is_verbatim() {
        let err = DumpError::ToolInvocation {
            message: "pg_dump: command not found".into(),
        };
        assert_eq!(err.to_string(), "pg_dump: command not found");
    }
}
