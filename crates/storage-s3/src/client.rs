//! AWS SDK S3 client implementation for the cold tier.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client as S3Client;
use chrono::Utc;
use tracing::debug;

use paper_vault_storage::{
    AccessDirection, SignedAccessGrant, StorageError, TierClient, UploadOptions, UploadReceipt,
};

use crate::settings::{ColdTierSettings, COLD_TIER_REGION};

/// `TierClient` implementation over an S3-compatible archival store.
pub struct ColdTierClient {
    s3_client: S3Client,
    bucket: String,
}

impl ColdTierClient {
    /// Create a new cold-tier client.
    ///
    /// # Arguments
    /// * `settings` - Endpoint, credential pair, and bucket
    ///
    /// # Returns
    /// A client scoped to `settings.bucket`.
    pub async fn new(settings: ColdTierSettings) -> Result<Self, StorageError> {
        let credentials = Credentials::new(
            &settings.access_key_id,
            &settings.secret_access_key,
            None,
            None,
            "paper-vault",
        );

        let timeouts = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(settings.timeout_secs))
            .build();

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(COLD_TIER_REGION))
            .endpoint_url(&settings.endpoint)
            .credentials_provider(credentials)
            .timeout_config(timeouts)
            .load()
            .await;

        Ok(Self {
            s3_client: S3Client::new(&sdk_config),
            bucket: settings.bucket,
        })
    }

    /// Create a client from an existing S3 client (for testing).
    pub fn from_client(s3_client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            s3_client,
            bucket: bucket.into(),
        }
    }

    /// Check whether an object exists at `key`.
    async fn object_exists(&self, key: &str) -> Result<bool, StorageError> {
        match self
            .s3_client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(StorageError::transport(service_err.to_string(), false))
                }
            }
        }
    }
}

#[async_trait]
impl TierClient for ColdTierClient {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: &[u8],
        options: &UploadOptions,
    ) -> Result<UploadReceipt, StorageError> {
        // The S3 API overwrites unconditionally, so the no-upsert path
        // checks existence first. Not atomic; callers own key uniqueness.
        if !options.upsert && self.object_exists(key).await? {
            return Err(StorageError::AlreadyExists {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            });
        }

        let mut request = self
            .s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes.to_vec()));

        if let Some(ref ct) = options.content_type {
            request = request.content_type(ct);
        }

        if let Some(ref meta) = options.metadata {
            for (k, v) in meta {
                request = request.metadata(k, v);
            }
        }

        request
            .send()
            .await
            .map_err(|err| StorageError::transport(err.to_string(), true))?;

        debug!(bucket = %self.bucket, key, size = bytes.len(), "cold tier put");

        Ok(UploadReceipt {
            key: key.to_string(),
            url: None,
        })
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .s3_client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    StorageError::not_found(&self.bucket, key)
                } else {
                    StorageError::transport(service_err.to_string(), true)
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::transport(e.to_string(), true))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.s3_client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| StorageError::transport(err.to_string(), true))?;
        Ok(())
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<(), StorageError> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut identifiers = Vec::with_capacity(keys.len());
        for key in keys {
            let id = ObjectIdentifier::builder()
                .key(key)
                .build()
                .map_err(|e| StorageError::InvalidConfig {
                    message: e.to_string(),
                })?;
            identifiers.push(id);
        }

        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .build()
            .map_err(|e| StorageError::InvalidConfig {
                message: e.to_string(),
            })?;

        self.s3_client
            .delete_objects()
            .bucket(&self.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|err| StorageError::transport(err.to_string(), true))?;

        debug!(bucket = %self.bucket, count = keys.len(), "cold tier batch delete");
        Ok(())
    }

    async fn copy_object(&self, from: &str, to: &str) -> Result<(), StorageError> {
        self.s3_client
            .copy_object()
            .bucket(&self.bucket)
            .copy_source(format!("{}/{}", self.bucket, from))
            .key(to)
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.to_string().contains("NoSuchKey") {
                    StorageError::not_found(&self.bucket, from)
                } else {
                    StorageError::transport(service_err.to_string(), true)
                }
            })?;
        Ok(())
    }

    async fn signed_url(
        &self,
        key: &str,
        ttl_seconds: u64,
        direction: AccessDirection,
    ) -> Result<SignedAccessGrant, StorageError> {
        let config = PresigningConfig::expires_in(Duration::from_secs(ttl_seconds)).map_err(
            |e| StorageError::InvalidConfig {
                message: format!("invalid presign ttl {ttl_seconds}: {e}"),
            },
        )?;

        let issued_at = Utc::now();
        let presigned = match direction {
            AccessDirection::Read => self
                .s3_client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .presigned(config)
                .await
                .map_err(|err| StorageError::transport(err.to_string(), true))?,
            AccessDirection::Write => self
                .s3_client
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .presigned(config)
                .await
                .map_err(|err| StorageError::transport(err.to_string(), true))?,
        };

        Ok(SignedAccessGrant::new(
            presigned.uri().to_string(),
            issued_at,
            ttl_seconds,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cold_tier_client_implements_contract() {
        // Compile-time check that the trait is implemented correctly.
        fn assert_tier_client<T: TierClient>() {}
        assert_tier_client::<ColdTierClient>();
    }
}
