//! In-memory fakes shared by rotation and pipeline tests.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::error::OffsiteError;
use crate::offsite::{OffsiteStore, RemoteArtifact};

/// An in-memory offsite folder.
pub(crate) struct FakeOffsiteStore {
    pub artifacts: Mutex<Vec<RemoteArtifact>>,
    /// Ids whose deletion should fail.
    pub undeletable: HashSet<String>,
    /// Fail every upload with this message.
    pub upload_failure: Option<String>,
    pub upload_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeOffsiteStore {
    pub fn new() -> Self {
        Self {
            artifacts: Mutex::new(Vec::new()),
            undeletable: HashSet::new(),
            upload_failure: None,
            upload_calls: AtomicUsize::new(0),
            next_id: AtomicUsize::new(1),
        }
    }

    /// Preload `count` artifacts, oldest first, each one hour apart.
    pub fn preloaded(count: usize) -> Self {
        let store = Self::new();
        {
            let mut artifacts = store.artifacts.lock().unwrap();
            let base = Utc::now() - Duration::days(30);
            for i in 0..count {
                artifacts.push(RemoteArtifact {
                    id: format!("old-{i}"),
                    name: format!("ictirc_backup_old_{i}.sql"),
                    created_at: base + Duration::hours(i as i64),
                    link: None,
                });
            }
        }
        store
    }

    pub fn ids(&self) -> Vec<String> {
        self.artifacts
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.id.clone())
            .collect()
    }
}

#[async_trait]
impl OffsiteStore for FakeOffsiteStore {
    async fn upload_file(&self, path: &Path, name: &str) -> Result<RemoteArtifact, OffsiteError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(ref message) = self.upload_failure {
            return Err(OffsiteError::Api {
                status: 500,
                message: message.clone(),
            });
        }
        if !path.exists() {
            return Err(OffsiteError::Io {
                path: path.display().to_string(),
                message: "no such file".into(),
            });
        }

        let artifact = RemoteArtifact {
            id: format!("remote-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            name: name.to_string(),
            created_at: Utc::now(),
            link: Some(format!("https://drive.example.com/{name}")),
        };
        self.artifacts.lock().unwrap().push(artifact.clone());
        Ok(artifact)
    }

    async fn list_artifacts(&self) -> Result<Vec<RemoteArtifact>, OffsiteError> {
        let mut artifacts = self.artifacts.lock().unwrap().clone();
        artifacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(artifacts)
    }

    async fn delete_artifact(&self, id: &str) -> Result<(), OffsiteError> {
        if self.undeletable.contains(id) {
            return Err(OffsiteError::Api {
                status: 403,
                message: format!("cannot delete {id}"),
            });
        }
        let mut artifacts = self.artifacts.lock().unwrap();
        let before = artifacts.len();
        artifacts.retain(|a| a.id != id);
        if artifacts.len() == before {
            return Err(OffsiteError::NotFound { id: id.to_string() });
        }
        Ok(())
    }
}
