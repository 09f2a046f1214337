//! SendGrid backend for Mailgate.
//!
//! Sends through the v3 `mail/send` endpoint and classifies failures by
//! HTTP status: `429` and `5xx` are transient, everything else is fatal.

pub mod backend;
pub mod config;
pub mod error;
pub mod types;

pub use backend::SendGridBackend;
pub use config::{API_KEY_ENV, DEFAULT_BASE_URL, SendGridConfig};
pub use error::{RATE_LIMIT_STATUS, SendGridError, classify_status};
pub use types::MailSendRequest;
