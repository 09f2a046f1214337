use mailgate_aws::SesBackend;
use mailgate_core::{DeliveryReceipt, EmailMessage};
use mailgate_lettermint::{ClientOptions, LettermintBackend};
use mailgate_provider::{ConfigError, DeliveryError, DynEmailBackend, ErrorClass, LogBackend};
use mailgate_sendgrid::SendGridBackend;
use mailgate_smtp::SmtpBackend;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::EmailConfig;

/// Sends email through whichever backend the configuration selects.
///
/// # Examples
///
/// ```
/// use mailgate_email::{EmailConfig, Mailer};
///
/// let mailer = Mailer::from_config(EmailConfig::Log).unwrap();
/// assert_eq!(mailer.provider_name(), "log");
/// ```
pub struct Mailer {
    backend: Box<dyn DynEmailBackend>,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("backend", &self.backend)
            .finish()
    }
}

impl Mailer {
    /// Build the configured backend. Credential fallbacks read the process
    /// environment.
    pub fn from_config(config: EmailConfig) -> Result<Self, ConfigError> {
        Self::from_config_with_env(config, |name| std::env::var(name).ok())
    }

    /// Build the configured backend with a custom environment lookup.
    pub fn from_config_with_env(
        config: EmailConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let backend: Box<dyn DynEmailBackend> = match config {
            EmailConfig::Smtp(smtp) => Box::new(SmtpBackend::new(smtp)?),
            EmailConfig::SendGrid(sendgrid) => Box::new(SendGridBackend::with_env(sendgrid, lookup)?),
            EmailConfig::Ses(ses) => Box::new(SesBackend::new(ses)?),
            EmailConfig::Lettermint(lettermint) => Box::new(LettermintBackend::with_options(
                &lettermint,
                ClientOptions::default(),
                lookup,
            )?),
            EmailConfig::Log => Box::new(LogBackend::new()),
        };
        debug!(provider = backend.provider_name(), "mailer backend ready");
        Ok(Self { backend })
    }

    /// Create a `Mailer` with a pre-built backend (for testing).
    pub fn with_backend(backend: Box<dyn DynEmailBackend>) -> Self {
        Self { backend }
    }

    pub fn provider_name(&self) -> &'static str {
        self.backend.provider_name()
    }

    /// Deliver one message through the active backend.
    pub async fn deliver(&self, email: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        self.backend.deliver(email).await
    }

    /// Deliver a message given as a loosely typed JSON object.
    ///
    /// Scalars are coerced to text; a malformed object is a fatal error and
    /// nothing is sent.
    #[instrument(skip_all, fields(provider = self.provider_name()))]
    pub async fn deliver_value(&self, value: &Value) -> Result<DeliveryReceipt, DeliveryError> {
        let email = EmailMessage::from_value(value).map_err(|e| {
            DeliveryError::new(
                self.backend.provider_name(),
                self.backend.display_name(),
                e,
                ErrorClass::Fatal,
            )
        })?;
        self.deliver(&email).await
    }
}
