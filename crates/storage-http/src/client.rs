//! HTTP object-store client implementation for the hot tier.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use paper_vault_storage::{
    AccessDirection, SignedAccessGrant, StorageError, TierClient, UploadOptions, UploadReceipt,
};

use crate::settings::HotTierSettings;

/// Header controlling overwrite behavior on upload.
const HEADER_UPSERT: &str = "x-upsert";

/// Header carrying the JSON-encoded object attribute map.
const HEADER_METADATA: &str = "x-object-metadata";

#[derive(Debug, Serialize)]
struct CopyMoveRequest<'a> {
    #[serde(rename = "bucketId")]
    bucket_id: &'a str,
    #[serde(rename = "sourceKey")]
    source_key: &'a str,
    #[serde(rename = "destinationKey")]
    destination_key: &'a str,
}

#[derive(Debug, Serialize)]
struct SignRequest {
    #[serde(rename = "expiresIn")]
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

#[derive(Debug, Serialize)]
struct BatchDeleteRequest<'a> {
    keys: &'a [String],
}

/// `TierClient` implementation over the hot store's HTTP API.
pub struct HotTierClient {
    http: Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl HotTierClient {
    /// Create a new hot-tier client with a bounded per-request timeout.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(settings: HotTierSettings) -> Result<Self, StorageError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| StorageError::InvalidConfig {
                message: format!("http client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: settings.base_url,
            service_key: settings.service_key,
            bucket: settings.bucket,
        })
    }

    /// Create a client from an existing `reqwest::Client` (for testing).
    pub fn from_client(
        http: Client,
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            service_key: service_key.into(),
            bucket: bucket.into(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/object/{}/{}", self.base_url, self.bucket, key)
    }

    /// Map a reqwest transport error into the storage taxonomy.
    ///
    /// Timeouts and connection failures are transport errors, never
    /// `NotFound`.
    fn transport_error(err: reqwest::Error) -> StorageError {
        let retryable = err.is_timeout() || err.is_connect();
        StorageError::transport(err.to_string(), retryable)
    }

    /// Map a non-success response status into the storage taxonomy.
    fn status_error(&self, status: StatusCode, key: &str, body: String) -> StorageError {
        match status {
            StatusCode::NOT_FOUND => StorageError::not_found(&self.bucket, key),
            StatusCode::CONFLICT => StorageError::AlreadyExists {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StorageError::AccessDenied {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                message: body,
            },
            status if status.is_server_error() => {
                StorageError::transport(format!("{status}: {body}"), true)
            }
            status => StorageError::transport(format!("{status}: {body}"), false),
        }
    }

    /// Turn a response into `Ok` or the mapped storage error.
    async fn check(&self, response: Response, key: &str) -> Result<Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(self.status_error(status, key, body))
        }
    }

    async fn sign(&self, endpoint: &str, key: &str, ttl_seconds: u64) -> Result<String, StorageError> {
        let url = format!("{}/{}/{}/{}", self.base_url, endpoint, self.bucket, key);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.service_key)
            .json(&SignRequest {
                expires_in: ttl_seconds,
            })
            .send()
            .await
            .map_err(Self::transport_error)?;
        let response = self.check(response, key).await?;

        let body: SignResponse = response
            .json()
            .await
            .map_err(|e| StorageError::transport(format!("malformed sign response: {e}"), false))?;

        // The store returns a path relative to its own base URL.
        if body.signed_url.starts_with("http") {
            Ok(body.signed_url)
        } else {
            Ok(format!(
                "{}/{}",
                self.base_url,
                body.signed_url.trim_start_matches('/')
            ))
        }
    }
}

#[async_trait]
impl TierClient for HotTierClient {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: &[u8],
        options: &UploadOptions,
    ) -> Result<UploadReceipt, StorageError> {
        let mut request = self
            .http
            .post(self.object_url(key))
            .bearer_auth(&self.service_key)
            .header(HEADER_UPSERT, if options.upsert { "true" } else { "false" })
            .body(bytes.to_vec());

        if let Some(ref ct) = options.content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, ct);
        }

        if let Some(ref meta) = options.metadata {
            let encoded = serde_json::to_string(meta).map_err(|e| StorageError::InvalidConfig {
                message: format!("metadata not JSON-encodable: {e}"),
            })?;
            request = request.header(HEADER_METADATA, encoded);
        }

        let response = request.send().await.map_err(Self::transport_error)?;
        self.check(response, key).await?;

        debug!(bucket = %self.bucket, key, size = bytes.len(), "hot tier put");

        Ok(UploadReceipt {
            key: key.to_string(),
            url: Some(self.object_url(key)),
        })
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .http
            .get(self.object_url(key))
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(Self::transport_error)?;
        let response = self.check(response, key).await?;

        let bytes = response.bytes().await.map_err(Self::transport_error)?;
        Ok(bytes.to_vec())
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        let response = self
            .http
            .delete(self.object_url(key))
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check(response, key).await?;
        Ok(())
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<(), StorageError> {
        if keys.is_empty() {
            return Ok(());
        }

        let url = format!("{}/object/{}", self.base_url, self.bucket);
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.service_key)
            .json(&BatchDeleteRequest { keys })
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check(response, "<batch>").await?;

        debug!(bucket = %self.bucket, count = keys.len(), "hot tier batch delete");
        Ok(())
    }

    async fn copy_object(&self, from: &str, to: &str) -> Result<(), StorageError> {
        let url = format!("{}/object/copy", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.service_key)
            .json(&CopyMoveRequest {
                bucket_id: &self.bucket,
                source_key: from,
                destination_key: to,
            })
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check(response, from).await?;
        Ok(())
    }

    async fn move_object(&self, from: &str, to: &str) -> Result<(), StorageError> {
        // The hot store moves server-side; the source is only unlinked once
        // the destination write is acknowledged.
        let url = format!("{}/object/move", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.service_key)
            .json(&CopyMoveRequest {
                bucket_id: &self.bucket,
                source_key: from,
                destination_key: to,
            })
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check(response, from).await?;
        Ok(())
    }

    async fn signed_url(
        &self,
        key: &str,
        ttl_seconds: u64,
        direction: AccessDirection,
    ) -> Result<SignedAccessGrant, StorageError> {
        let issued_at = Utc::now();
        let url = match direction {
            AccessDirection::Read => self.sign("object/sign", key, ttl_seconds).await?,
            AccessDirection::Write => self.sign("object/upload/sign", key, ttl_seconds).await?,
        };
        Ok(SignedAccessGrant::new(url, issued_at, ttl_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HotTierClient {
        HotTierClient::from_client(Client::new(), "https://hot.example.com", "key", "papers")
    }

    #[test]
    fn test_hot_tier_client_implements_contract() {
        fn assert_tier_client<T: TierClient>() {}
        assert_tier_client::<HotTierClient>();
    }

    #[test]
    fn test_object_url_layout() {
        assert_eq!(
            client().object_url("papers/42/final.pdf"),
            "https://hot.example.com/object/papers/papers/42/final.pdf"
        );
    }

    #[test]
    fn test_status_mapping() {
        let c = client();
        assert!(matches!(
            c.status_error(StatusCode::NOT_FOUND, "k", String::new()),
            StorageError::NotFound { .. }
        ));
        assert!(matches!(
            c.status_error(StatusCode::CONFLICT, "k", String::new()),
            StorageError::AlreadyExists { .. }
        ));
        assert!(matches!(
            c.status_error(StatusCode::FORBIDDEN, "k", "denied".into()),
            StorageError::AccessDenied { .. }
        ));

        let err = c.status_error(StatusCode::BAD_GATEWAY, "k", String::new());
        assert!(err.is_retryable());

        let err = c.status_error(StatusCode::BAD_REQUEST, "k", String::new());
        assert!(!err.is_retryable());
    }
}
