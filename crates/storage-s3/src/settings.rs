//! Cold-tier configuration.

use paper_vault_common::{require_var, ConfigError, DEFAULT_REMOTE_TIMEOUT_SECS};

/// Region sentinel required by the cold store's S3-compatible API.
pub const COLD_TIER_REGION: &str = "auto";

/// Configuration for the cold tier.
///
/// All fields are required; construction fails fast on a missing
/// credential rather than failing on first use.
#[derive(Debug, Clone)]
pub struct ColdTierSettings {
    /// Account-scoped endpoint host, e.g. `https://<account>.r2.example.com`.
    pub endpoint: String,
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Bucket holding archival copies.
    pub bucket: String,
    /// Bound applied to each remote call, in seconds.
    pub timeout_secs: u64,
}

impl ColdTierSettings {
    /// Create settings with the default remote timeout.
    pub fn new(
        endpoint: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            bucket: bucket.into(),
            timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }

    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingVar` for any absent credential.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(
            require_var("COLD_TIER_ENDPOINT")?,
            require_var("COLD_TIER_ACCESS_KEY_ID")?,
            require_var("COLD_TIER_SECRET_ACCESS_KEY")?,
            require_var("COLD_TIER_BUCKET")?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_timeout() {
        let settings = ColdTierSettings::new("https://acc.example.com", "ak", "sk", "archive");
        assert_eq!(settings.timeout_secs, DEFAULT_REMOTE_TIMEOUT_SECS);
        assert_eq!(settings.bucket, "archive");
    }
}
