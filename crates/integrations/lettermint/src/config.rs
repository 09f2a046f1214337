use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable consulted when no API token is configured.
pub const API_TOKEN_ENV: &str = "LETTERMINT_API_TOKEN";

/// Default Lettermint API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.lettermint.co";

/// Connection options for one [`LettermintClient`](crate::LettermintClient).
///
/// Each client owns its options; nothing is shared process-wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientOptions {
    /// Apply the overrides set in `config`. Unset overrides keep the
    /// current values.
    #[must_use]
    pub fn with_overrides(mut self, config: &LettermintConfig) -> Self {
        if let Some(base_url) = config.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            base_url.trim_end_matches('/').clone_into(&mut self.base_url);
        }
        if let Some(secs) = config.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }
}

/// Configuration for the Lettermint backend.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LettermintConfig {
    /// API token. Falls back to `LETTERMINT_API_TOKEN` when absent.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Base URL override.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout override in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for LettermintConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LettermintConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LettermintConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: Some(api_token.into()),
            ..Self::default()
        }
    }

    /// Override the API base URL (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}
