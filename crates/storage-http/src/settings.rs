//! Hot-tier configuration.

use paper_vault_common::{require_var, ConfigError, DEFAULT_REMOTE_TIMEOUT_SECS};

/// Configuration for the hot tier.
#[derive(Debug, Clone)]
pub struct HotTierSettings {
    /// Base URL of the object-store API, without a trailing slash.
    pub base_url: String,
    /// Service key sent as a bearer token.
    pub service_key: String,
    /// Bucket holding live assets.
    pub bucket: String,
    /// Bound applied to each remote call, in seconds.
    pub timeout_secs: u64,
}

impl HotTierSettings {
    /// Create settings with the default remote timeout.
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        let mut base_url: String = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            service_key: service_key.into(),
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
            require_var("HOT_TIER_URL")?,
            require_var("HOT_TIER_SERVICE_KEY")?,
            require_var("HOT_TIER_BUCKET")?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let settings = HotTierSettings::new("https://hot.example.com/", "key", "papers");
        assert_eq!(settings.base_url, "https://hot.example.com");
    }
}
