use mailgate_core::{DeliveryReceipt, NormalizedEmail};
use mailgate_provider::{BackendError, ConfigError, EmailBackend, ErrorClass, resolve_credential};

use crate::client::LettermintClient;
use crate::config::{API_TOKEN_ENV, ClientOptions, LettermintConfig};
use crate::error::LettermintError;
use crate::types::SendEmailRequest;

/// Lettermint delivery backend built on [`LettermintClient`].
#[derive(Debug)]
pub struct LettermintBackend {
    client: LettermintClient,
}

impl LettermintBackend {
    /// Create a Lettermint backend, reading `LETTERMINT_API_TOKEN` when the
    /// configuration carries no token.
    pub fn new(config: &LettermintConfig) -> Result<Self, ConfigError> {
        Self::with_options(config, ClientOptions::default(), |name| std::env::var(name).ok())
    }

    /// Create a Lettermint backend on top of `options`, with a custom
    /// environment lookup. Overrides in `config` replace only the options
    /// they set.
    pub fn with_options(
        config: &LettermintConfig,
        options: ClientOptions,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let token = resolve_credential(config.api_token.as_deref(), "api_token", API_TOKEN_ENV, lookup)?;
        let options = options.with_overrides(config);
        if options.base_url.trim().is_empty() {
            return Err(ConfigError::MissingSetting("base_url"));
        }
        let client = LettermintClient::new(token, options)
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &LettermintClient {
        &self.client
    }
}

impl EmailBackend for LettermintBackend {
    type Error = LettermintError;

    fn provider_name(&self) -> &'static str {
        "lettermint"
    }

    fn display_name(&self) -> &'static str {
        "Lettermint"
    }

    async fn perform_delivery(
        &self,
        email: &NormalizedEmail,
    ) -> Result<DeliveryReceipt, BackendError<LettermintError>> {
        let request = SendEmailRequest::from(email);
        let response = self
            .client
            .send(&request)
            .await
            .map_err(BackendError::Transport)?;
        Ok(DeliveryReceipt::new("lettermint", response.status).with_message_id(response.message_id))
    }

    fn classify_error(&self, error: &LettermintError) -> ErrorClass {
        error.classification()
    }
}
