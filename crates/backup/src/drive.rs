//! Consumer cloud-drive client under a service-account identity.
//!
//! Authentication is an RS256 JWT bearer grant exchanged for a short-lived
//! access token. Scopes follow least privilege: uploads and deletions use
//! the file-write scope (objects the service account created), listing uses
//! the read-only scope. Uploads are the resumable two-step flow so the
//! artifact body is streamed from disk, never buffered whole.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use paper_vault_common::{optional_var, require_var, ConfigError, DEFAULT_REMOTE_TIMEOUT_SECS};

use crate::error::OffsiteError;
use crate::offsite::{OffsiteStore, RemoteArtifact};

/// Drive API base for metadata operations.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Drive API base for upload sessions.
const DRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// OAuth2 grant type for JWT bearer assertions.
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Scope allowing writes to files the service account created.
/// Never request full-drive scope for upload-only operation.
pub const SCOPE_DRIVE_FILE: &str = "https://www.googleapis.com/auth/drive.file";

/// Read-only scope used for listing.
pub const SCOPE_DRIVE_READONLY: &str = "https://www.googleapis.com/auth/drive.readonly";

/// Default token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Lifetime requested for each access token.
const TOKEN_TTL_SECS: i64 = 3_600;

/// Cached tokens are refreshed this long before expiry.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Bound on the streamed artifact upload; sized for multi-gigabyte dumps.
const UPLOAD_TIMEOUT_SECS: u64 = 3_600;

/// Service-account configuration for the offsite drive.
#[derive(Debug, Clone)]
pub struct DriveSettings {
    /// Service-account email (JWT issuer).
    pub client_email: String,
    /// RSA private key in PEM form.
    pub private_key_pem: String,
    /// Destination folder identifier.
    pub folder_id: String,
    /// Token endpoint.
    pub token_uri: String,
}

impl DriveSettings {
    /// Create settings with the default token endpoint.
    pub fn new(
        client_email: impl Into<String>,
        private_key_pem: impl Into<String>,
        folder_id: impl Into<String>,
    ) -> Self {
        Self {
            client_email: client_email.into(),
            private_key_pem: private_key_pem.into(),
            folder_id: folder_id.into(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
        }
    }

    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingVar` for any absent credential.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::new(
            require_var("DRIVE_CLIENT_EMAIL")?,
            require_var("DRIVE_PRIVATE_KEY")?,
            require_var("DRIVE_FOLDER_ID")?,
        );
        if let Some(uri) = optional_var("DRIVE_TOKEN_URI") {
            settings.token_uri = uri;
        }
        Ok(settings)
    }
}

/// JWT claims for the service-account assertion.
#[derive(Debug, Serialize)]
struct GrantClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct CreateFileMetadata<'a> {
    name: &'a str,
    parents: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    created_time: Option<DateTime<Utc>>,
    web_view_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

impl From<DriveFile> for RemoteArtifact {
    fn from(file: DriveFile) -> Self {
        RemoteArtifact {
            id: file.id,
            name: file.name,
            created_at: file.created_time.unwrap_or_else(Utc::now),
            link: file.web_view_link,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// `OffsiteStore` implementation over the drive API.
pub struct DriveClient {
    http: Client,
    settings: DriveSettings,
    encoding_key: EncodingKey,
    tokens: Mutex<HashMap<&'static str, CachedToken>>,
}

impl std::fmt::Debug for DriveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveClient")
            .field("http", &self.http)
            .field("settings", &self.settings)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl DriveClient {
    /// Create a new drive client, validating the private key up front.
    ///
    /// # Errors
    /// Returns `Auth` for an unusable key and `Transport` if the HTTP
    /// client cannot be built.
    pub fn new(settings: DriveSettings) -> Result<Self, OffsiteError> {
        let encoding_key = EncodingKey::from_rsa_pem(settings.private_key_pem.as_bytes())
            .map_err(|e| OffsiteError::Auth {
                message: format!("invalid service-account key: {e}"),
            })?;

        // No client-wide timeout: metadata calls get the default bound per
        // request and the streamed upload gets a longer one.
        let http = Client::builder()
            .build()
            .map_err(|e| OffsiteError::Transport {
                message: e.to_string(),
                retryable: false,
            })?;

        Ok(Self {
            http,
            settings,
            encoding_key,
            tokens: Mutex::new(HashMap::new()),
        })
    }

    fn transport_error(err: reqwest::Error) -> OffsiteError {
        OffsiteError::Transport {
            message: err.to_string(),
            retryable: err.is_timeout() || err.is_connect(),
        }
    }

    /// Build the folder-scoped list query.
    fn list_query(folder_id: &str) -> [(&'static str, String); 4] {
        [
            (
                "q",
                format!("'{folder_id}' in parents and trashed = false"),
            ),
            ("orderBy", "createdTime desc".to_string()),
            (
                "fields",
                "files(id,name,createdTime,webViewLink)".to_string(),
            ),
            ("pageSize", "1000".to_string()),
        ]
    }

    /// Obtain an access token for `scope`, reusing a cached one while it
    /// has more than the refresh margin left.
    async fn token(&self, scope: &'static str) -> Result<String, OffsiteError> {
        {
            let tokens = self.tokens.lock().unwrap();
            if let Some(cached) = tokens.get(scope) {
                let margin = chrono::Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);
                if cached.expires_at - margin > Utc::now() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let issued_at = Utc::now();
        let claims = GrantClaims {
            iss: &self.settings.client_email,
            scope,
            aud: &self.settings.token_uri,
            exp: issued_at.timestamp() + TOKEN_TTL_SECS,
            iat: issued_at.timestamp(),
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| OffsiteError::Auth {
                message: format!("could not sign grant: {e}"),
            })?;

        let response = self
            .http
            .post(&self.settings.token_uri)
            .timeout(Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS))
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OffsiteError::Auth {
                message: format!("token exchange failed ({status}): {body}"),
            });
        }

        let token: TokenResponse = response.json().await.map_err(Self::transport_error)?;

        let cached = CachedToken {
            access_token: token.access_token.clone(),
            expires_at: issued_at + chrono::Duration::seconds(TOKEN_TTL_SECS),
        };
        self.tokens.lock().unwrap().insert(scope, cached);

        debug!(scope, "obtained offsite access token");
        Ok(token.access_token)
    }

    async fn api_error(response: reqwest::Response) -> OffsiteError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        OffsiteError::Api {
            status: status.as_u16(),
            message: body,
        }
    }
}

#[async_trait]
impl OffsiteStore for DriveClient {
    async fn upload_file(&self, path: &Path, name: &str) -> Result<RemoteArtifact, OffsiteError> {
        let token = self.token(SCOPE_DRIVE_FILE).await?;

        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| OffsiteError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
            .len();

        // Step one: open an upload session with the object metadata.
        let session_url = format!(
            "{DRIVE_UPLOAD_BASE}/files?uploadType=resumable&fields=id,name,createdTime,webViewLink"
        );
        let response = self
            .http
            .post(&session_url)
            .timeout(Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS))
            .bearer_auth(&token)
            .header("X-Upload-Content-Length", size)
            .json(&CreateFileMetadata {
                name,
                parents: [self.settings.folder_id.as_str()],
            })
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let upload_url = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| OffsiteError::Api {
                status: response.status().as_u16(),
                message: "upload session missing location header".to_string(),
            })?;

        // Step two: stream the artifact body into the session.
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| OffsiteError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        let response = self
            .http
            .put(&upload_url)
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .header(reqwest::header::CONTENT_LENGTH, size)
            .body(body)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let file: DriveFile = response.json().await.map_err(Self::transport_error)?;
        debug!(id = %file.id, name = %file.name, size, "offsite upload complete");
        Ok(file.into())
    }

    async fn list_artifacts(&self) -> Result<Vec<RemoteArtifact>, OffsiteError> {
        let token = self.token(SCOPE_DRIVE_READONLY).await?;

        let response = self
            .http
            .get(format!("{DRIVE_API_BASE}/files"))
            .timeout(Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS))
            .bearer_auth(&token)
            .query(&Self::list_query(&self.settings.folder_id))
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        // One page covers any sane retention window; rotation keeps the
        // folder far below the page size.
        let list: FileList = response.json().await.map_err(Self::transport_error)?;
        Ok(list.files.into_iter().map(RemoteArtifact::from).collect())
    }

    async fn delete_artifact(&self, id: &str) -> Result<(), OffsiteError> {
        let token = self.token(SCOPE_DRIVE_FILE).await?;

        let response = self
            .http
            .delete(format!("{DRIVE_API_BASE}/files/{id}"))
            .timeout(Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(Self::transport_error)?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                warn!(id, "offsite artifact already gone");
                Err(OffsiteError::NotFound { id: id.to_string() })
            }
            _ => Err(Self::api_error(response).await),
        }
    }
}
