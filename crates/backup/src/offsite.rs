//! Offsite backup store contract.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::OffsiteError;

/// A backup artifact's remote copy.
#[derive(Debug, Clone)]
pub struct RemoteArtifact {
    /// Remote object identifier.
    pub id: String,
    /// Object name (the artifact filename).
    pub name: String,
    /// Remote creation time. Authoritative for retention ordering.
    pub created_at: DateTime<Utc>,
    /// Human-viewable link, when the API provides one.
    pub link: Option<String>,
}

/// Operations against the offsite destination folder.
///
/// Implemented by `DriveClient` in production and by in-memory fakes in
/// tests. Upload streams from disk and must not require the whole artifact
/// in memory.
#[async_trait]
pub trait OffsiteStore: Send + Sync {
    /// Upload a local file under `name`, returning its remote identity.
    /// The local file is left untouched whether or not this succeeds.
    async fn upload_file(&self, path: &Path, name: &str) -> Result<RemoteArtifact, OffsiteError>;

    /// List artifacts in the destination folder, newest first.
    async fn list_artifacts(&self) -> Result<Vec<RemoteArtifact>, OffsiteError>;

    /// Delete one artifact by remote id.
    async fn delete_artifact(&self, id: &str) -> Result<(), OffsiteError>;
}
