//! Logical (row-level) export fallback.
//!
//! When the dump tool is unavailable, a structured export enumerates the
//! fixed set of logical tables through the data-access seam and writes one
//! self-describing JSON document tagged with a format version and an export
//! timestamp.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use paper_vault_common::EXPORT_FORMAT_VERSION;

use crate::artifact::{artifact_file_name, ArtifactKind, BackupArtifact};
use crate::dump::DumpProducer;
use crate::error::DumpError;

/// The logical tables included in every export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalTable {
    Users,
    Authors,
    /// Papers carry their authorship nested inside each row.
    Papers,
    Categories,
    Volumes,
    Issues,
    Conferences,
}

impl LogicalTable {
    /// Every table, in export order.
    pub const ALL: [LogicalTable; 7] = [
        LogicalTable::Users,
        LogicalTable::Authors,
        LogicalTable::Papers,
        LogicalTable::Categories,
        LogicalTable::Volumes,
        LogicalTable::Issues,
        LogicalTable::Conferences,
    ];

    /// Key used for this table in the export document.
    pub fn name(&self) -> &'static str {
        match self {
            LogicalTable::Users => "users",
            LogicalTable::Authors => "authors",
            LogicalTable::Papers => "papers",
            LogicalTable::Categories => "categories",
            LogicalTable::Volumes => "volumes",
            LogicalTable::Issues => "issues",
            LogicalTable::Conferences => "conferences",
        }
    }
}

/// Data-access seam the export reads through.
///
/// The relational store and its query layer are external collaborators;
/// implementations adapt them to row enumeration. Rows are plain JSON
/// values so the export does not depend on the schema crate.
#[async_trait]
pub trait ExportSource: Send + Sync {
    /// Enumerate all rows of one logical table.
    async fn rows(&self, table: LogicalTable) -> Result<Vec<serde_json::Value>, DumpError>;
}

/// The export document written to disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Shape version of this document (`EXPORT_FORMAT_VERSION`).
    pub format_version: u32,
    /// When the export was taken.
    pub exported_at: DateTime<Utc>,
    /// Keyed table snapshots.
    pub tables: BTreeMap<String, Vec<serde_json::Value>>,
}

/// `DumpProducer` that assembles a logical export document.
pub struct LogicalExportProducer<S> {
    source: S,
}

impl<S: ExportSource> LogicalExportProducer<S> {
    /// Create a producer over the given data-access seam.
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: ExportSource> DumpProducer for LogicalExportProducer<S> {
    async fn produce(&self, out_dir: &Path, prefix: &str) -> Result<BackupArtifact, DumpError> {
        let exported_at = Utc::now();

        let mut tables = BTreeMap::new();
        for table in LogicalTable::ALL {
            let rows = self.source.rows(table).await?;
            debug!(table = table.name(), rows = rows.len(), "exported table");
            tables.insert(table.name().to_string(), rows);
        }

        let document = ExportDocument {
            format_version: EXPORT_FORMAT_VERSION,
            exported_at,
            tables,
        };

        let bytes =
            serde_json::to_vec_pretty(&document).map_err(|e| DumpError::Serialization {
                message: e.to_string(),
            })?;

        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|e| DumpError::from_io(out_dir.display().to_string(), e))?;

        let file_name = artifact_file_name(prefix, ArtifactKind::LogicalExport, exported_at);
        let path = out_dir.join(&file_name);

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| DumpError::from_io(path.display().to_string(), e))?;

        let size_bytes = tokio::fs::metadata(&path)
            .await
            .map_err(|e| DumpError::from_io(path.display().to_string(), e))?
            .len();
        if size_bytes == 0 {
            // Cannot happen with a serialized document, but the contract is
            // the same for both strategies: never report an empty artifact.
            let _ = tokio::fs::remove_file(&path).await;
            return Err(DumpError::EmptyArtifact {
                path: path.display().to_string(),
            });
        }

        Ok(BackupArtifact {
            path,
            file_name,
            size_bytes,
            created_at: exported_at,
            kind: ArtifactKind::LogicalExport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixtureSource;

    #[async_trait]
    impl ExportSource for FixtureSource {
        async fn rows(&self, table: LogicalTable) -> Result<Vec<serde_json::Value>, DumpError> {
            Ok(match table {
                LogicalTable::Users => vec![json!({"id": 1, "email": "editor@ictirc.org"})],
                LogicalTable::Papers => vec![json!({
                    "id": 42,
                    "title": "On Tiered Storage",
                    "authorship": [{"author_id": 7, "position": 1}],
                })],
                _ => vec![],
            })
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl ExportSource for BrokenSource {
        async fn rows(&self, table: LogicalTable) -> Result<Vec<serde_json::Value>, DumpError> {
            Err(DumpError::TableExport {
                table: table.name().to_string(),
                message: "connection closed".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_export_writes_versioned_document_with_all_tables() {
        let dir = tempfile::tempdir().unwrap();
        let producer = LogicalExportProducer::new(FixtureSource);

        let artifact = producer.produce(dir.path(), "ictirc").await.unwrap();
        assert!(artifact.file_name.starts_with("ictirc_export_"));
        assert!(artifact.file_name.ends_with(".json"));
        assert_eq!(artifact.kind, ArtifactKind::LogicalExport);
        assert!(artifact.size_bytes > 0);

        let raw = std::fs::read(&artifact.path).unwrap();
        let document: ExportDocument = serde_json::from_slice(&raw).unwrap();
        assert_eq!(document.format_version, EXPORT_FORMAT_VERSION);
        assert_eq!(document.tables.len(), LogicalTable::ALL.len());
        assert_eq!(document.tables["users"].len(), 1);
        assert_eq!(
            document.tables["papers"][0]["authorship"][0]["author_id"],
            json!(7)
        );
        assert!(document.tables["volumes"].is_empty());
    }

    #[tokio::test]
    async fn test_source_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let producer = LogicalExportProducer::new(BrokenSource);

        let err = producer.produce(dir.path(), "ictirc").await.unwrap_err();
        assert!(matches!(err, DumpError::TableExport { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_export_creates_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("backups/daily");
        let producer = LogicalExportProducer::new(FixtureSource);

        let artifact = producer.produce(&nested, "ictirc").await.unwrap();
        assert!(artifact.path.starts_with(&nested));
    }
}
