//! Database backup pipeline for paper-vault.
//!
//! One backup run is a strict sequence: produce a local artifact (external
//! dump tool or logical export), optionally push it to the offsite drive
//! folder under a service-account identity, rotate old remote copies down to
//! the retention count, and optionally remove the local file once a remote
//! copy is confirmed.
//!
//! The composite result follows a partial-success policy: producing the
//! local artifact decides success; upload and rotation failures are
//! sub-results for operator attention, never escalated. This crate is a
//! library driven by an external scheduler; outcomes are typed reports, not
//! exit codes.

mod artifact;
mod drive;
mod dump;
mod error;
mod export;
mod offsite;
mod pipeline;
mod rotate;
mod settings;

#[cfg(test)]
pub(crate) mod testutil;

pub use artifact::{artifact_file_name, ArtifactKind, BackupArtifact};
pub use drive::{
    DriveClient, DriveSettings, DEFAULT_TOKEN_URI, SCOPE_DRIVE_FILE, SCOPE_DRIVE_READONLY,
};
pub use dump::{
    parse_connection_string, DatabaseCoordinates, DumpProducer, NativeDumpProducer,
    DEFAULT_DUMP_TOOL,
};
pub use error::{DumpError, OffsiteError};
pub use export::{ExportDocument, ExportSource, LogicalExportProducer, LogicalTable};
pub use offsite::{OffsiteStore, RemoteArtifact};
pub use pipeline::{BackupPipeline, BackupRunReport, RotationReport, UploadOutcome};
pub use rotate::{rotate, RotationOutcome};
pub use settings::{BackupSettings, DumpStrategy, DEFAULT_ARTIFACT_PREFIX};
