use mailgate_provider::{ErrorClass, NetworkErrorKind, TransportError, reqwest_network_kind};
use thiserror::Error;

/// Status code SendGrid uses for rate limiting.
pub const RATE_LIMIT_STATUS: u16 = 429;

/// Errors specific to the SendGrid backend.
#[derive(Debug, Error)]
pub enum SendGridError {
    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// SendGrid answered with a non-success status.
    #[error("API error (HTTP {status_code}): {response_body}")]
    Api {
        status_code: u16,
        response_body: String,
    },
}

impl SendGridError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

impl TransportError for SendGridError {
    fn network_kind(&self) -> Option<NetworkErrorKind> {
        match self {
            Self::Http(e) => reqwest_network_kind(e),
            Self::Api { .. } => None,
        }
    }
}

/// Classify a SendGrid response status.
///
/// Rate limiting and server errors are transient; every other status,
/// including unexpected non-error codes, is fatal.
pub fn classify_status(status_code: u16) -> ErrorClass {
    if status_code == RATE_LIMIT_STATUS || (500..600).contains(&status_code) {
        ErrorClass::Transient
    } else {
        ErrorClass::Fatal
    }
}
