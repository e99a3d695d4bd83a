//! Shared constants used across paper-vault crates.

/// Default TTL for signed read access to private assets (1 hour).
pub const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3_600;

/// Extended TTL for public-facing streaming grants (24 hours).
/// Callers must opt in explicitly; this is never a silent default.
pub const STREAMING_SIGNED_URL_TTL_SECS: u64 = 86_400;

/// Default number of offsite backup artifacts kept by rotation.
pub const DEFAULT_RETENTION_KEEP: usize = 6;

/// Default bound on any single remote HTTP call (object store or drive API).
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Bound on a native dump subprocess run (10 minutes).
pub const DEFAULT_DUMP_TIMEOUT_SECS: u64 = 600;

/// Version tag embedded in logical-export documents.
/// Bump when the export document shape changes.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// Timestamp layout used in artifact filenames.
/// Colons are replaced by dashes so names stay filesystem-safe, and the
/// layout sorts lexically in chronological order.
pub const ARTIFACT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";
