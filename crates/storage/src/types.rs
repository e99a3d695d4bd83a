//! Shared data structures for storage-tier operations.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use paper_vault_common::{DEFAULT_SIGNED_URL_TTL_SECS, STREAMING_SIGNED_URL_TTL_SECS};

// Metadata keys attached to stored objects. Both tiers carry the same
// attribute map; backends translate to their native metadata mechanism.

/// Metadata key for the owning subject (paper or video) identifier.
pub const METADATA_KEY_SUBJECT_ID: &str = "subject-id";

/// Metadata key for the original client-side filename.
pub const METADATA_KEY_ORIGINAL_FILENAME: &str = "original-filename";

/// Metadata key for the uploader identity.
pub const METADATA_KEY_UPLOADED_BY: &str = "uploaded-by";

/// Metadata key for the upload timestamp (RFC 3339).
pub const METADATA_KEY_UPLOADED_AT: &str = "uploaded-at";

/// Direction of access a signed URL grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessDirection {
    /// Download the object.
    Read,
    /// Upload bytes to the key (two-step large-file flow).
    Write,
}

/// Options for an upload operation.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// MIME type stored alongside the object.
    pub content_type: Option<String>,
    /// Optional attribute map (see `METADATA_KEY_*`).
    pub metadata: Option<HashMap<String, String>>,
    /// Overwrite an existing object at the same key.
    /// Overwriting is always an explicit caller choice, never implicit.
    pub upsert: bool,
}

impl UploadOptions {
    /// Options with the given content type and no metadata.
    pub fn with_content_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            ..Self::default()
        }
    }

    /// Enable overwriting an existing object.
    #[must_use]
    pub fn allow_overwrite(mut self) -> Self {
        self.upsert = true;
        self
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    /// Tier-relative key the object was stored under.
    pub key: String,
    /// Public URL when the tier exposes one for this bucket.
    pub url: Option<String>,
}

/// A time-bounded capability URL for one object.
///
/// Grants are derived, never persisted: each issuance computes
/// `expires_at = issued_at + ttl` and two issuances with the same inputs
/// are independent but equivalent. Revocation belongs to the backing
/// store; there is no local revocation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedAccessGrant {
    /// The capability URL.
    pub url: String,
    /// Absolute expiry instant.
    pub expires_at: DateTime<Utc>,
}

impl SignedAccessGrant {
    /// Build a grant expiring `ttl_seconds` after `issued_at`.
    pub fn new(url: impl Into<String>, issued_at: DateTime<Utc>, ttl_seconds: u64) -> Self {
        Self {
            url: url.into(),
            expires_at: issued_at + Duration::seconds(ttl_seconds as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_expiry_is_issue_time_plus_ttl() {
        let issued = Utc::now();
        let grant = SignedAccessGrant::new("https://x/y", issued, DEFAULT_SIGNED_URL_TTL_SECS);
        assert_eq!(grant.expires_at - issued, Duration::seconds(3_600));
    }

    #[test]
    fn test_upload_options_default_is_no_overwrite() {
        let options = UploadOptions::with_content_type("application/pdf");
        assert!(!options.upsert);
        assert!(options.allow_overwrite().upsert);
    }
}
