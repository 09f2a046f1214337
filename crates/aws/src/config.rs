use std::time::Duration;

use mailgate_provider::ConfigError;
use serde::{Deserialize, Serialize};

/// Shared AWS settings: region, static credentials and an endpoint
/// override for local development (e.g. `LocalStack`).
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AwsBaseConfig {
    /// AWS region (e.g. `"us-east-1"`).
    #[serde(default)]
    pub region: String,

    /// Access key ID for request signing.
    #[serde(default)]
    pub access_key_id: String,

    /// Secret access key for request signing.
    #[serde(default)]
    pub secret_access_key: String,

    /// Optional endpoint URL override for local development.
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Connect and operation timeout in seconds. Defaults to 30.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for AwsBaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsBaseConfig")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("endpoint_url", &self.endpoint_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AwsBaseConfig {
    /// Create a new `AwsBaseConfig` with region and static credentials.
    pub fn new(
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            endpoint_url: None,
            timeout_secs: None,
        }
    }

    /// Set an endpoint URL override for local development.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(30))
    }

    /// Check required settings. The region is checked before credentials.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::MissingSetting("region"));
        }
        if self.access_key_id.trim().is_empty() {
            return Err(ConfigError::MissingSetting("access_key_id"));
        }
        if self.secret_access_key.trim().is_empty() {
            return Err(ConfigError::MissingSetting("secret_access_key"));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "AWS timeout must be at least one second".to_owned(),
            ));
        }
        Ok(())
    }
}
