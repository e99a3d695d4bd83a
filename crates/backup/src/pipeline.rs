//! The backup orchestrator.
//!
//! One run walks DUMPING → UPLOADING → ROTATING → LOCAL_CLEANUP strictly in
//! order; each step's output is the next step's input, so there is no
//! fan-out. A dump failure is the only thing that fails the composite
//! result. Everything after a successful dump is best effort and reported
//! through sub-results: the local backup existing is what "success" means.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::artifact::BackupArtifact;
use crate::dump::DumpProducer;
use crate::offsite::{OffsiteStore, RemoteArtifact};
use crate::rotate::{rotate, RotationOutcome};
use crate::settings::BackupSettings;

/// Result of the offsite upload stage.
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    /// The artifact has a remote copy.
    Uploaded(RemoteArtifact),
    /// Upload failed; the local artifact is untouched.
    Failed { message: String },
}

impl UploadOutcome {
    /// Whether the upload stage succeeded.
    pub fn succeeded(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded(_))
    }
}

/// Result of the rotation stage.
#[derive(Debug, Clone)]
pub enum RotationReport {
    /// Rotation ran; individual deletion failures are inside the outcome.
    Completed(RotationOutcome),
    /// Rotation could not even list the folder.
    Failed { message: String },
}

/// Composite result of one backup run.
///
/// `success` is true exactly when a local artifact was produced. Remote
/// failures never flip it; they surface in `upload` and `rotation` for
/// operator attention.
#[derive(Debug)]
pub struct BackupRunReport {
    /// Whether a usable local backup exists.
    pub success: bool,
    /// The produced artifact, when dumping succeeded.
    pub artifact: Option<BackupArtifact>,
    /// Dump failure message, when dumping failed.
    pub dump_error: Option<String>,
    /// Upload sub-result; `None` when upload was disabled or never reached.
    pub upload: Option<UploadOutcome>,
    /// Rotation sub-result; `None` unless upload succeeded.
    pub rotation: Option<RotationReport>,
    /// Whether the local artifact was removed after upload.
    pub local_removed: bool,
}

impl BackupRunReport {
    fn failed(dump_error: String) -> Self {
        Self {
            success: false,
            artifact: None,
            dump_error: Some(dump_error),
            upload: None,
            rotation: None,
            local_removed: false,
        }
    }

    fn dumped(artifact: BackupArtifact) -> Self {
        Self {
            success: true,
            artifact: Some(artifact),
            dump_error: None,
            upload: None,
            rotation: None,
            local_removed: false,
        }
    }

    /// Remote copies pruned by this run.
    pub fn deleted_count(&self) -> usize {
        match &self.rotation {
            Some(RotationReport::Completed(outcome)) => outcome.deleted,
            _ => 0,
        }
    }
}

/// Sequences dump, offsite upload, rotation, and local cleanup.
///
/// Clients are injected: tests substitute fakes, and multiple credential
/// sets can coexist in one process. Concurrent runs against the same
/// destination folder are not mutually excluded; the platform schedules
/// backups from a single scheduler, and two racing rotations could each
/// keep a different "newest N" set.
pub struct BackupPipeline {
    producer: Arc<dyn DumpProducer>,
    offsite: Option<Arc<dyn OffsiteStore>>,
    settings: BackupSettings,
}

impl BackupPipeline {
    /// Create a pipeline.
    ///
    /// Passing `offsite: None` disables the remote steps regardless of
    /// `settings.upload_enabled`.
    pub fn new(
        producer: Arc<dyn DumpProducer>,
        offsite: Option<Arc<dyn OffsiteStore>>,
        settings: BackupSettings,
    ) -> Self {
        Self {
            producer,
            offsite,
            settings,
        }
    }

    /// Run one backup.
    pub async fn run(&self) -> BackupRunReport {
        info!(
            dir = %self.settings.output_dir.display(),
            prefix = %self.settings.prefix,
            "backup run starting"
        );

        let artifact = match self
            .producer
            .produce(&self.settings.output_dir, &self.settings.prefix)
            .await
        {
            Ok(artifact) => artifact,
            Err(e) => {
                error!(error = %e, "dump failed; no remote step attempted");
                return BackupRunReport::failed(e.to_string());
            }
        };

        info!(
            file = %artifact.file_name,
            size_bytes = artifact.size_bytes,
            "local artifact produced"
        );
        let mut report = BackupRunReport::dumped(artifact.clone());

        let store = match (&self.offsite, self.settings.upload_enabled) {
            (Some(store), true) => store,
            // Local-only backup is a valid terminal state.
            _ => return report,
        };

        match store.upload_file(&artifact.path, &artifact.file_name).await {
            Ok(remote) => {
                info!(id = %remote.id, "offsite upload complete");
                report.upload = Some(UploadOutcome::Uploaded(remote));
            }
            Err(e) => {
                // Deliberate partial success: the local backup exists.
                warn!(error = %e, "offsite upload failed; local backup kept");
                report.upload = Some(UploadOutcome::Failed {
                    message: e.to_string(),
                });
                return report;
            }
        }

        match rotate(store.as_ref(), self.settings.retention_keep).await {
            Ok(outcome) => report.rotation = Some(RotationReport::Completed(outcome)),
            Err(e) => {
                warn!(error = %e, "rotation failed");
                report.rotation = Some(RotationReport::Failed {
                    message: e.to_string(),
                });
            }
        }

        if self.settings.delete_local_after_upload {
            // Only reachable with a confirmed remote copy; the local file is
            // never the only copy when it is removed.
            match tokio::fs::remove_file(&artifact.path).await {
                Ok(()) => {
                    info!(file = %artifact.file_name, "local artifact removed after upload");
                    report.local_removed = true;
                }
                Err(e) => {
                    warn!(file = %artifact.file_name, error = %e, "could not remove local artifact");
                }
            }
        }

        report
    }
}
