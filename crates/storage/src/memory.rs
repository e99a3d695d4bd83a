//! In-memory `TierClient` used by tests of higher layers.
//!
//! Keeps full contract semantics (upsert flag, copy vs move, grant expiry)
//! so orchestration code can be exercised without a backing store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StorageError;
use crate::traits::TierClient;
use crate::types::{AccessDirection, SignedAccessGrant, UploadOptions, UploadReceipt};

#[derive(Debug, Clone)]
struct StoredEntry {
    bytes: Vec<u8>,
    content_type: Option<String>,
    metadata: Option<HashMap<String, String>>,
}

/// An in-memory storage tier.
pub struct MemoryTierClient {
    bucket: String,
    objects: Mutex<HashMap<String, StoredEntry>>,
}

impl MemoryTierClient {
    /// Create an empty tier scoped to `bucket`.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Whether the tier holds no objects.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored content type for a key, if present.
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .and_then(|e| e.content_type.clone())
    }

    /// Stored metadata map for a key, if present.
    pub fn metadata(&self, key: &str) -> Option<HashMap<String, String>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .and_then(|e| e.metadata.clone())
    }
}

#[async_trait]
impl TierClient for MemoryTierClient {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: &[u8],
        options: &UploadOptions,
    ) -> Result<UploadReceipt, StorageError> {
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(key) && !options.upsert {
            return Err(StorageError::AlreadyExists {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            });
        }
        objects.insert(
            key.to_string(),
            StoredEntry {
                bytes: bytes.to_vec(),
                content_type: options.content_type.clone(),
                metadata: options.metadata.clone(),
            },
        );
        Ok(UploadReceipt {
            key: key.to_string(),
            url: None,
        })
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|e| e.bytes.clone())
            .ok_or_else(|| StorageError::not_found(&self.bucket, key))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        match self.objects.lock().unwrap().remove(key) {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found(&self.bucket, key)),
        }
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<(), StorageError> {
        let mut objects = self.objects.lock().unwrap();
        for key in keys {
            objects.remove(key);
        }
        Ok(())
    }

    async fn copy_object(&self, from: &str, to: &str) -> Result<(), StorageError> {
        let mut objects = self.objects.lock().unwrap();
        let entry = objects
            .get(from)
            .cloned()
            .ok_or_else(|| StorageError::not_found(&self.bucket, from))?;
        objects.insert(to.to_string(), entry);
        Ok(())
    }

    async fn signed_url(
        &self,
        key: &str,
        ttl_seconds: u64,
        direction: AccessDirection,
    ) -> Result<SignedAccessGrant, StorageError> {
        let verb = match direction {
            AccessDirection::Read => "read",
            AccessDirection::Write => "write",
        };
        let url = format!(
            "memory://{}/{}?direction={}&ttl={}",
            self.bucket, key, verb, ttl_seconds
        );
        Ok(SignedAccessGrant::new(url, Utc::now(), ttl_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use paper_vault_common::DEFAULT_SIGNED_URL_TTL_SECS;

    fn client() -> MemoryTierClient {
        MemoryTierClient::new("papers")
    }

    #[tokio::test]
    async fn test_upload_download_round_trip() {
        let tier = client();
        let body = b"%PDF-1.7 manuscript bytes".to_vec();
        tier.put_object(
            "papers/42/final.pdf",
            &body,
            &UploadOptions::with_content_type("application/pdf"),
        )
        .await
        .unwrap();

        let fetched = tier.get_object("papers/42/final.pdf").await.unwrap();
        assert_eq!(fetched, body);
        assert_eq!(
            tier.content_type("papers/42/final.pdf").as_deref(),
            Some("application/pdf")
        );
    }

    #[tokio::test]
    async fn test_put_without_upsert_rejects_existing_key() {
        let tier = client();
        let options = UploadOptions::default();
        tier.put_object("k", b"v1", &options).await.unwrap();

        let err = tier.put_object("k", b"v2", &options).await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));
        assert_eq!(tier.get_object("k").await.unwrap(), b"v1");

        tier.put_object("k", b"v2", &options.clone().allow_overwrite())
            .await
            .unwrap();
        assert_eq!(tier.get_object("k").await.unwrap(), b"v2");
    }

    #[tokio::test]
    async fn test_copy_keeps_source() {
        let tier = client();
        tier.put_object("a", b"x", &UploadOptions::default())
            .await
            .unwrap();
        tier.copy_object("a", "b").await.unwrap();

        assert_eq!(tier.get_object("a").await.unwrap(), b"x");
        assert_eq!(tier.get_object("b").await.unwrap(), b"x");
    }

    #[tokio::test]
    async fn test_move_deletes_source_after_copy() {
        let tier = client();
        tier.put_object("a", b"x", &UploadOptions::default())
            .await
            .unwrap();
        tier.move_object("a", "b").await.unwrap();

        assert!(matches!(
            tier.get_object("a").await.unwrap_err(),
            StorageError::NotFound { .. }
        ));
        assert_eq!(tier.get_object("b").await.unwrap(), b"x");
    }

    #[tokio::test]
    async fn test_move_of_missing_source_fails_without_side_effects() {
        let tier = client();
        let err = tier.move_object("missing", "b").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
        assert!(tier.is_empty());
    }

    #[tokio::test]
    async fn test_batch_delete() {
        let tier = client();
        for key in ["a", "b", "c"] {
            tier.put_object(key, b"x", &UploadOptions::default())
                .await
                .unwrap();
        }
        tier.delete_objects(&["a".into(), "c".into(), "ghost".into()])
            .await
            .unwrap();
        assert_eq!(tier.len(), 1);
        assert!(tier.get_object("b").await.is_ok());
    }

    #[tokio::test]
    async fn test_signed_url_expiry_matches_ttl() {
        let tier = client();
        let before = Utc::now();
        let grant = tier
            .signed_url(
                "papers/42/final.pdf",
                DEFAULT_SIGNED_URL_TTL_SECS,
                AccessDirection::Read,
            )
            .await
            .unwrap();
        let after = Utc::now();

        // expires_at = issued_at + ttl, with issuance between the two probes.
        assert!(grant.expires_at >= before + Duration::seconds(3_600));
        assert!(grant.expires_at <= after + Duration::seconds(3_600));
    }

    #[tokio::test]
    async fn test_signed_url_issuance_is_idempotent() {
        let tier = client();
        let a = tier
            .signed_url("k", 60, AccessDirection::Write)
            .await
            .unwrap();
        let b = tier
            .signed_url("k", 60, AccessDirection::Write)
            .await
            .unwrap();
        assert_eq!(a.url, b.url);
    }
}
