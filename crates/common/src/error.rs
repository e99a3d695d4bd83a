//! Shared error types used across paper-vault crates.

use thiserror::Error;

/// Configuration errors raised while constructing a client or pipeline.
///
/// These are the only errors in the system that are allowed to abort
/// startup: a missing credential cannot be recovered from at runtime.
/// Everything downstream of construction reports failures as values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("Missing required configuration: {name}")]
    MissingVar {
        /// Name of the missing variable.
        name: String,
    },

    /// A variable is present but its value cannot be used.
    #[error("Invalid configuration {name}: {message}")]
    Invalid {
        /// Name of the offending variable.
        name: String,
        /// Why the value was rejected.
        message: String,
    },
}

impl ConfigError {
    /// Create a `MissingVar` error for the given variable name.
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingVar { name: name.into() }
    }

    /// Create an `Invalid` error for the given variable name.
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_var_display() {
        let err = ConfigError::missing("COLD_TIER_BUCKET");
        assert_eq!(
            err.to_string(),
            "Missing required configuration: COLD_TIER_BUCKET"
        );
    }

    #[test]
    fn test_invalid_display() {
        let err = ConfigError::invalid("PV_RETENTION_KEEP", "not a number: abc");
        assert!(err.to_string().contains("PV_RETENTION_KEEP"));
        assert!(err.to_string().contains("not a number"));
    }
}
