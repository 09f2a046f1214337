use std::future::Future;

use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::AsyncSmtpTransportBuilder;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use mailgate_provider::ConfigError;
use tracing::debug;

use crate::config::{Encryption, SmtpConfig};
use crate::error::SmtpError;

/// Whether a submission authenticates with the configured credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    WithCredentials,
    Anonymous,
}

/// Hands a built message to an SMTP server.
///
/// The backend drives the auth fallback on top of this seam; tests script
/// it without a server.
pub trait SmtpSubmitter: Send + Sync + std::fmt::Debug {
    fn submit(
        &self,
        message: &Message,
        auth: AuthMode,
    ) -> impl Future<Output = Result<(), SmtpError>> + Send;
}

/// Production submitter on `lettre`'s async SMTP transport.
///
/// A fresh transport is built for every submission, so each attempt opens
/// its own connection.
pub struct LettreSubmitter {
    config: SmtpConfig,
}

impl std::fmt::Debug for LettreSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LettreSubmitter")
            .field("config", &self.config)
            .field("transport", &"<AsyncSmtpTransport>")
            .finish()
    }
}

impl LettreSubmitter {
    /// Create a submitter, building one transport up front so TLS
    /// parameter errors surface at construction.
    pub fn new(config: SmtpConfig) -> Result<Self, ConfigError> {
        build_transport(&config, AuthMode::Anonymous)
            .map_err(|e| ConfigError::Invalid(format!("SMTP transport: {e}")))?;
        Ok(Self { config })
    }
}

impl SmtpSubmitter for LettreSubmitter {
    async fn submit(&self, message: &Message, auth: AuthMode) -> Result<(), SmtpError> {
        let transport = build_transport(&self.config, auth)?;
        let response = transport
            .send(message.clone())
            .await
            .map_err(|e| SmtpError::from_lettre(&e))?;
        debug!(
            host = %self.config.host,
            code = %response.code(),
            ?auth,
            "SMTP server accepted message"
        );
        Ok(())
    }
}

fn relay_builder(config: &SmtpConfig) -> Result<AsyncSmtpTransportBuilder, SmtpError> {
    let host = config.host.as_str();
    match config.encryption {
        Encryption::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| SmtpError::Tls(format!("STARTTLS relay: {e}"))),
        Encryption::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| SmtpError::Tls(format!("TLS relay: {e}"))),
        Encryption::None => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)),
    }
}

fn build_transport(
    config: &SmtpConfig,
    auth: AuthMode,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, SmtpError> {
    let builder = relay_builder(config)?
        .port(config.port)
        .timeout(Some(config.timeout()));

    let builder = match (auth, config.credentials()) {
        (AuthMode::WithCredentials, Some((user, pass))) => {
            builder.credentials(Credentials::new(user.to_owned(), pass.to_owned()))
        }
        _ => builder,
    };

    Ok(builder.build())
}
