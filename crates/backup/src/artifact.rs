//! Backup artifact identity and naming.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use paper_vault_common::ARTIFACT_TIMESTAMP_FORMAT;

/// The two kinds of backup artifact a producer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Raw dump written by the external dump tool.
    NativeDump,
    /// Self-describing logical export document.
    LogicalExport,
}

impl ArtifactKind {
    /// Label embedded in the artifact filename.
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::NativeDump => "backup",
            ArtifactKind::LogicalExport => "export",
        }
    }

    /// File extension for this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::NativeDump => "sql",
            ArtifactKind::LogicalExport => "json",
        }
    }
}

/// One point-in-time snapshot produced by a backup run.
#[derive(Debug, Clone)]
pub struct BackupArtifact {
    /// Local path of the artifact file.
    pub path: PathBuf,
    /// Filename (also used as the remote object name on upload).
    pub file_name: String,
    /// Size in bytes, verified non-zero by the producer.
    pub size_bytes: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Which strategy produced it.
    pub kind: ArtifactKind,
}

/// Format an artifact filename: `{prefix}_{backup|export}_{timestamp}.{ext}`.
///
/// The timestamp layout sorts lexically in chronological order, but
/// creation time stays authoritative for retention decisions.
pub fn artifact_file_name(prefix: &str, kind: ArtifactKind, at: DateTime<Utc>) -> String {
    format!(
        "{}_{}_{}.{}",
        prefix,
        kind.label(),
        at.format(ARTIFACT_TIMESTAMP_FORMAT),
        kind.extension()
    )
}
