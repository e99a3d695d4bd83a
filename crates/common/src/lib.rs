//! Shared types and utilities for paper-vault.
//!
//! This crate provides common functionality used across all paper-vault crates:
//! - Configuration error type (the only startup-fatal error class)
//! - Named default constants for TTLs, retention, and timeouts
//! - Environment-variable parsing helpers

pub mod constants;
pub mod env;
pub mod error;

// Re-export commonly used items at crate root
pub use constants::*;
pub use env::{optional_var, parse_bool, parse_usize, require_var};
pub use error::ConfigError;
