use mailgate_core::{DeliveryReceipt, NormalizedEmail};
use mailgate_provider::{BackendError, ConfigError, EmailBackend, ErrorClass, resolve_credential};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::{API_KEY_ENV, SendGridConfig};
use crate::error::{SendGridError, classify_status};
use crate::types::MailSendRequest;

/// SendGrid backend that delivers through the v3 `mail/send` endpoint.
pub struct SendGridBackend {
    api_key: String,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for SendGridBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendGridBackend")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SendGridBackend {
    /// Create a SendGrid backend, reading `SENDGRID_API_KEY` when the
    /// configuration carries no key.
    pub fn new(config: SendGridConfig) -> Result<Self, ConfigError> {
        Self::with_env(config, |name| std::env::var(name).ok())
    }

    /// Create a SendGrid backend with a custom environment lookup.
    pub fn with_env(
        config: SendGridConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = resolve_credential(config.api_key.as_deref(), "api_key", API_KEY_ENV, lookup)?;
        if config.base_url.trim().is_empty() {
            return Err(ConfigError::MissingSetting("base_url"));
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    fn send_url(&self) -> String {
        format!("{}/v3/mail/send", self.base_url)
    }

    #[instrument(skip_all, fields(provider = "sendgrid"))]
    async fn send_mail(&self, request: &MailSendRequest) -> Result<Option<String>, SendGridError> {
        let response = self
            .client
            .post(self.send_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let response_body = response.text().await.unwrap_or_default();
            return Err(SendGridError::Api {
                status_code: status.as_u16(),
                response_body,
            });
        }

        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        debug!(status = status.as_u16(), ?message_id, "SendGrid accepted message");
        Ok(message_id)
    }
}

impl EmailBackend for SendGridBackend {
    type Error = SendGridError;

    fn provider_name(&self) -> &'static str {
        "sendgrid"
    }

    fn display_name(&self) -> &'static str {
        "SendGrid"
    }

    async fn perform_delivery(
        &self,
        email: &NormalizedEmail,
    ) -> Result<DeliveryReceipt, BackendError<SendGridError>> {
        let request = MailSendRequest::from(email);
        let message_id = self
            .send_mail(&request)
            .await
            .map_err(BackendError::Transport)?;

        let receipt = DeliveryReceipt::new("sendgrid", "accepted");
        Ok(match message_id {
            Some(id) => receipt.with_message_id(id),
            None => receipt,
        })
    }

    fn classify_error(&self, error: &SendGridError) -> ErrorClass {
        match error {
            SendGridError::Api { status_code, .. } => classify_status(*status_code),
            SendGridError::Http(_) => ErrorClass::Fatal,
        }
    }
}
