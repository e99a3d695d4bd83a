//! The tier-agnostic storage contract.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::{AccessDirection, SignedAccessGrant, UploadOptions, UploadReceipt};

/// Operations every storage tier supports.
///
/// The hot tier (low-latency serving) and the cold tier (durable archive)
/// implement the same contract against different backing stores, so
/// lifecycle code can copy objects between tiers without caring which is
/// which. Implementations are injected by the caller; there are no shared
/// singletons.
///
/// Operations on different keys are independent and may run concurrently.
/// Callers own key uniqueness: the contract does not serialize overlapping
/// writes to the same key.
#[async_trait]
pub trait TierClient: Send + Sync {
    /// Bucket (or folder) this client is scoped to.
    fn bucket(&self) -> &str;

    /// Upload bytes to the given tier-relative key.
    ///
    /// Fails with `AlreadyExists` when the key is taken and
    /// `options.upsert` is false.
    async fn put_object(
        &self,
        key: &str,
        bytes: &[u8],
        options: &UploadOptions,
    ) -> Result<UploadReceipt, StorageError>;

    /// Download an object's bytes.
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Delete a single object.
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;

    /// Delete several objects in one backend call where supported.
    async fn delete_objects(&self, keys: &[String]) -> Result<(), StorageError>;

    /// Copy an object within the tier. The source is never deleted.
    async fn copy_object(&self, from: &str, to: &str) -> Result<(), StorageError>;

    /// Move an object within the tier.
    ///
    /// The source is deleted only after the destination write has been
    /// acknowledged by the backing store. Backends with a native move
    /// override this.
    async fn move_object(&self, from: &str, to: &str) -> Result<(), StorageError> {
        self.copy_object(from, to).await?;
        self.delete_object(from).await
    }

    /// Issue a time-bounded signed URL for one object.
    ///
    /// Issuance is a pure function of (credentials, key, ttl, direction):
    /// no state, no side effects, always safe to call concurrently. Use
    /// `DEFAULT_SIGNED_URL_TTL_SECS` for private reads; longer TTLs (e.g.
    /// `STREAMING_SIGNED_URL_TTL_SECS`) are an explicit caller decision.
    async fn signed_url(
        &self,
        key: &str,
        ttl_seconds: u64,
        direction: AccessDirection,
    ) -> Result<SignedAccessGrant, StorageError>;
}
