//! Environment-variable helpers for `from_env` constructors.
//!
//! Reading happens once at construction time; the parse helpers are pure
//! so settings validation can be tested without mutating the process
//! environment.

use crate::error::ConfigError;

/// Read a required environment variable.
///
/// # Arguments
/// * `name` - Variable name
///
/// # Errors
/// Returns `ConfigError::MissingVar` if the variable is unset or empty.
pub fn require_var(name: &str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::missing(name)),
    }
}

/// Read an optional environment variable.
///
/// Unset and empty values both map to `None`.
pub fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Parse a boolean flag value.
///
/// Accepts `true`/`false`, `1`/`0`, `yes`/`no` (case-insensitive).
///
/// # Errors
/// Returns `ConfigError::Invalid` for anything else.
pub fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::invalid(
            name,
            format!("expected a boolean, got {other:?}"),
        )),
    }
}

/// Parse a non-negative integer value.
///
/// # Errors
/// Returns `ConfigError::Invalid` if the value is not a `usize`.
pub fn parse_usize(name: &str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::invalid(name, format!("not a number: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        for raw in ["true", "TRUE", "1", "yes"] {
            assert!(parse_bool("FLAG", raw).unwrap());
        }
        for raw in ["false", "0", "No"] {
            assert!(!parse_bool("FLAG", raw).unwrap());
        }
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        let err = parse_bool("FLAG", "maybe").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_parse_usize() {
        assert_eq!(parse_usize("KEEP", "6").unwrap(), 6);
        assert_eq!(parse_usize("KEEP", " 12 ").unwrap(), 12);
        assert!(parse_usize("KEEP", "-1").is_err());
        assert!(parse_usize("KEEP", "six").is_err());
    }
}
