//! Backup pipeline configuration.

use std::path::PathBuf;

use paper_vault_common::{
    optional_var, parse_bool, parse_usize, require_var, ConfigError, DEFAULT_RETENTION_KEEP,
};

/// Default artifact-name prefix for this platform.
pub const DEFAULT_ARTIFACT_PREFIX: &str = "ictirc";

/// Which dump strategy produces the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpStrategy {
    /// External dump tool.
    Native,
    /// Row-level export through the data-access layer.
    Logical,
}

impl DumpStrategy {
    /// Parse a strategy flag value.
    pub fn parse(name: &str, raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(DumpStrategy::Native),
            "logical" => Ok(DumpStrategy::Logical),
            other => Err(ConfigError::invalid(
                name,
                format!("expected \"native\" or \"logical\", got {other:?}"),
            )),
        }
    }
}

/// Settings driving one backup pipeline.
///
/// Validated once at construction; there are no inline fallbacks at use
/// sites, every default is a named constant.
#[derive(Debug, Clone)]
pub struct BackupSettings {
    /// Directory local artifacts are written to.
    pub output_dir: PathBuf,
    /// Artifact-name prefix.
    pub prefix: String,
    /// Dump strategy selector.
    pub strategy: DumpStrategy,
    /// Connection string for the native strategy.
    pub database_url: Option<String>,
    /// Whether the offsite upload step runs at all.
    pub upload_enabled: bool,
    /// Artifacts kept by rotation.
    pub retention_keep: usize,
    /// Remove the local artifact after a successful upload.
    pub delete_local_after_upload: bool,
}

impl BackupSettings {
    /// Settings for a local-only backup with platform defaults.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: DEFAULT_ARTIFACT_PREFIX.to_string(),
            strategy: DumpStrategy::Native,
            database_url: None,
            upload_enabled: false,
            retention_keep: DEFAULT_RETENTION_KEEP,
            delete_local_after_upload: false,
        }
    }

    /// Read settings from the process environment.
    ///
    /// `PV_BACKUP_DIR` is required; everything else falls back to the
    /// named defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` for a missing directory or malformed flag.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::new(require_var("PV_BACKUP_DIR")?);

        if let Some(prefix) = optional_var("PV_BACKUP_PREFIX") {
            settings.prefix = prefix;
        }
        if let Some(raw) = optional_var("PV_DUMP_STRATEGY") {
            settings.strategy = DumpStrategy::parse("PV_DUMP_STRATEGY", &raw)?;
        }
        settings.database_url = optional_var("DATABASE_URL");
        if let Some(raw) = optional_var("PV_BACKUP_UPLOAD_ENABLED") {
            settings.upload_enabled = parse_bool("PV_BACKUP_UPLOAD_ENABLED", &raw)?;
        }
        if let Some(raw) = optional_var("PV_RETENTION_KEEP") {
            settings.retention_keep = parse_usize("PV_RETENTION_KEEP", &raw)?;
        }
        if let Some(raw) = optional_var("PV_DELETE_LOCAL_AFTER_UPLOAD") {
            settings.delete_local_after_upload = parse_bool("PV_DELETE_LOCAL_AFTER_UPLOAD", &raw)?;
        }

        if settings.strategy == DumpStrategy::Native && settings.database_url.is_none() {
            return Err(ConfigError::missing("DATABASE_URL"));
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = BackupSettings::new("/var/backups");
        assert_eq!(settings.prefix, DEFAULT_ARTIFACT_PREFIX);
        assert_eq!(settings.retention_keep, DEFAULT_RETENTION_KEEP);
        assert!(!settings.upload_enabled);
        assert!(!settings.delete_local_after_upload);
        assert_eq!(settings.strategy, DumpStrategy::Native);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(
            DumpStrategy::parse("S", "Native").unwrap(),
            DumpStrategy::Native
        );
        assert_eq!(
            DumpStrategy::parse("S", "logical").unwrap(),
            DumpStrategy::Logical
        );
        assert!(DumpStrategy::parse("S", "full").is_err());
    }
}
