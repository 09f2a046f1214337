use mailgate_core::{DeliveryReceipt, NormalizedEmail};
use mailgate_provider::{BackendError, ConfigError, EmailBackend, ErrorClass};
use tracing::{info, warn};

use crate::config::SmtpConfig;
use crate::error::SmtpError;
use crate::message::build_message;
use crate::transport::{AuthMode, LettreSubmitter, SmtpSubmitter};

/// SMTP delivery backend.
///
/// When the server rejects the configured credentials, the message is
/// submitted once more without them. Relays that accept unauthenticated
/// mail from trusted networks still deliver; the auth failure is only
/// logged. If that single fallback also fails, its error is what the
/// caller sees.
#[derive(Debug)]
pub struct SmtpBackend<S = LettreSubmitter> {
    config: SmtpConfig,
    submitter: S,
}

impl SmtpBackend {
    /// Create an SMTP backend on the `lettre` transport.
    pub fn new(config: SmtpConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let submitter = LettreSubmitter::new(config.clone())?;
        Ok(Self { config, submitter })
    }
}

impl<S: SmtpSubmitter> SmtpBackend<S> {
    /// Create an SMTP backend on a custom submitter.
    pub fn with_submitter(config: SmtpConfig, submitter: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, submitter })
    }

    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }

    fn receipt() -> DeliveryReceipt {
        DeliveryReceipt::new("smtp", "sent")
    }
}

impl<S: SmtpSubmitter> EmailBackend for SmtpBackend<S> {
    type Error = SmtpError;

    fn provider_name(&self) -> &'static str {
        "smtp"
    }

    fn display_name(&self) -> &'static str {
        "SMTP"
    }

    async fn perform_delivery(
        &self,
        email: &NormalizedEmail,
    ) -> Result<DeliveryReceipt, BackendError<SmtpError>> {
        let message = build_message(email).map_err(BackendError::Transport)?;

        let primary = if self.config.has_credentials() {
            AuthMode::WithCredentials
        } else {
            AuthMode::Anonymous
        };

        match self.submitter.submit(&message, primary).await {
            Ok(()) => Ok(Self::receipt()),
            Err(err) if err.is_authentication() && self.config.has_credentials() => {
                warn!(
                    host = %self.config.host,
                    error = %err,
                    "SMTP authentication failed, retrying without credentials"
                );
                match self.submitter.submit(&message, AuthMode::Anonymous).await {
                    Ok(()) => {
                        info!(host = %self.config.host, "SMTP delivery succeeded without credentials");
                        Ok(Self::receipt())
                    }
                    Err(fallback) => Err(BackendError::Delivery(self.wrap_error(fallback))),
                }
            }
            Err(err) => Err(BackendError::Transport(err)),
        }
    }

    fn classify_error(&self, error: &SmtpError) -> ErrorClass {
        match error {
            SmtpError::Busy { .. } | SmtpError::Timeout(_) | SmtpError::Network { .. } => {
                ErrorClass::Transient
            }
            SmtpError::Authentication { .. }
            | SmtpError::Syntax { .. }
            | SmtpError::Rejected { .. }
            | SmtpError::Tls(_)
            | SmtpError::Message(_)
            | SmtpError::Other(_) => ErrorClass::Fatal,
        }
    }
}
