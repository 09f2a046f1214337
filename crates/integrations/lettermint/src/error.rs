use std::collections::BTreeMap;
use std::time::Duration;

use mailgate_provider::{ErrorClass, NetworkErrorKind, TransportError, reqwest_network_kind};
use thiserror::Error;

/// Every failure the Lettermint client can report.
#[derive(Debug, Error)]
pub enum LettermintError {
    #[error("request timed out")]
    Timeout,

    /// HTTP 429. `retry_after` comes from the `Retry-After` header.
    #[error("rate limited{}", .retry_after.map(|d| format!(" (retry after {}s)", d.as_secs())).unwrap_or_default())]
    RateLimit { retry_after: Option<Duration> },

    /// HTTP 422 with per-field messages.
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        errors: BTreeMap<String, Vec<String>>,
    },

    /// HTTP 401 or 403.
    #[error("authentication failed (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    /// Any other 4xx.
    #[error("client error (HTTP {status}): {message}")]
    ClientError { status: u16, message: String },

    /// Any 5xx.
    #[error("server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    /// A non-success status outside the 4xx and 5xx ranges.
    #[error("unexpected HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request failed before a response arrived.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// A success response could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl LettermintError {
    /// Map a non-success status and its parsed body to an error variant.
    pub fn from_status(
        status: u16,
        message: String,
        errors: BTreeMap<String, Vec<String>>,
        retry_after: Option<Duration>,
    ) -> Self {
        match status {
            401 | 403 => Self::Authentication { status, message },
            422 => Self::Validation { message, errors },
            429 => Self::RateLimit { retry_after },
            400..=499 => Self::ClientError { status, message },
            500..=599 => Self::ServerError { status, message },
            _ => Self::Http { status, message },
        }
    }

    /// Seconds to wait before retrying, when the API said so.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Retry classification for this variant.
    pub fn classification(&self) -> ErrorClass {
        match self {
            Self::Timeout | Self::RateLimit { .. } | Self::ServerError { .. } => {
                ErrorClass::Transient
            }
            Self::Http { status, .. } if *status >= 500 => ErrorClass::Transient,
            Self::Transport(e) => reqwest_network_kind(e)
                .map_or(ErrorClass::Fatal, NetworkErrorKind::classification),
            _ => ErrorClass::Fatal,
        }
    }
}

impl TransportError for LettermintError {
    fn network_kind(&self) -> Option<NetworkErrorKind> {
        match self {
            Self::Timeout => Some(NetworkErrorKind::Timeout),
            Self::Transport(e) => reqwest_network_kind(e),
            _ => None,
        }
    }
}
