use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response};
use tracing::{debug, instrument, warn};

use crate::config::ClientOptions;
use crate::error::LettermintError;
use crate::types::{ErrorBody, SendEmailRequest, SendEmailResponse};

/// Header carrying the API token.
pub const TOKEN_HEADER: &str = "x-lettermint-token";

/// Typed client for the Lettermint API.
///
/// Every HTTP outcome is turned into [`SendEmailResponse`] or one
/// [`LettermintError`] variant.
pub struct LettermintClient {
    token: String,
    options: ClientOptions,
    http: Client,
}

impl std::fmt::Debug for LettermintClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LettermintClient")
            .field("token", &"[REDACTED]")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl LettermintClient {
    pub fn new(token: impl Into<String>, options: ClientOptions) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(options.timeout).build()?;
        Ok(Self {
            token: token.into(),
            options,
            http,
        })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Send one email.
    #[instrument(skip_all, fields(provider = "lettermint"))]
    pub async fn send(&self, request: &SendEmailRequest) -> Result<SendEmailResponse, LettermintError> {
        let url = format!("{}/v1/send", self.options.base_url);
        let response = self
            .http
            .post(&url)
            .header(TOKEN_HEADER, &self.token)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response.text().await.map_err(map_transport_error)?;
        let parsed: SendEmailResponse =
            serde_json::from_str(&body).map_err(|e| LettermintError::Decode(e.to_string()))?;
        debug!(message_id = %parsed.message_id, status = %parsed.status, "Lettermint accepted message");
        Ok(parsed)
    }
}

fn map_transport_error(error: reqwest::Error) -> LettermintError {
    if error.is_timeout() {
        LettermintError::Timeout
    } else {
        LettermintError::Transport(error)
    }
}

async fn error_from_response(response: Response) -> LettermintError {
    let status = response.status().as_u16();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs);

    let text = response.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let message = body
        .message
        .unwrap_or_else(|| if text.is_empty() { format!("HTTP {status}") } else { text });

    if status == 429 {
        warn!(?retry_after, "Lettermint rate limit hit");
    }
    LettermintError::from_status(status, message, body.errors, retry_after)
}
