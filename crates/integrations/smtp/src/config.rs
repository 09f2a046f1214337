use std::time::Duration;

use mailgate_provider::ConfigError;
use serde::{Deserialize, Serialize};

/// Connection security for the SMTP session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encryption {
    /// Plain-text session. Only suitable for trusted local relays.
    None,
    /// Upgrade to TLS with `STARTTLS` (submission port 587).
    #[default]
    StartTls,
    /// Implicit TLS from the first byte (port 465).
    Tls,
}

/// SMTP backend configuration.
///
/// Only `host` is required. Credentials are used when both `username` and
/// `password` are present.
#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub host: String,

    /// SMTP server port. Defaults to 587.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Optional SMTP username for authentication.
    #[serde(default)]
    pub username: Option<String>,

    /// Optional SMTP password for authentication.
    #[serde(default)]
    pub password: Option<String>,

    /// Connection security. Defaults to `STARTTLS`.
    #[serde(default)]
    pub encryption: Encryption,

    /// Connect and command timeout in seconds. Defaults to 30.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    587
}

fn default_timeout_secs() -> u64 {
    30
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("encryption", &self.encryption)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SmtpConfig {
    /// Create a configuration for `host` with default port, `STARTTLS` and
    /// no credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use mailgate_smtp::SmtpConfig;
    ///
    /// let config = SmtpConfig::new("smtp.example.com").with_credentials("user", "pass");
    /// assert_eq!(config.port, 587);
    /// assert!(config.has_credentials());
    /// ```
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            username: None,
            password: None,
            encryption: Encryption::default(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Override the default SMTP port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set SMTP authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the connection security mode.
    #[must_use]
    pub fn with_encryption(mut self, encryption: Encryption) -> Self {
        self.encryption = encryption;
        self
    }

    /// Set the connect and command timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured username and password, if both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_some()
    }

    /// Check the settings that can be verified without a connection.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingSetting("host"));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("SMTP port must be non-zero".to_owned()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "SMTP timeout must be at least one second".to_owned(),
            ));
        }
        Ok(())
    }
}
