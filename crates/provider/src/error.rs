use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Retry classification of a delivery failure.
///
/// There are exactly two states. Anything that cannot be placed with
/// confidence is [`ErrorClass::Fatal`], which is also the `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorClass {
    /// An identical retry may succeed (network blip, rate limit, overload).
    Transient,
    /// Retrying with the same input will reproduce the failure.
    #[default]
    Fatal,
}

impl ErrorClass {
    /// Parse a classification label. Only `"transient"` (case-insensitive)
    /// maps to [`ErrorClass::Transient`]; every other label is fatal.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("transient") {
            Self::Transient
        } else {
            Self::Fatal
        }
    }

    pub fn is_transient(self) -> bool {
        self == Self::Transient
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error type callers receive from any backend.
///
/// Carries a human-readable message, the original cause (shared, never
/// discarded) and a `transient` flag callers can branch on for retries.
/// Cloning a `DeliveryError` shares the same cause.
#[derive(Clone)]
pub struct DeliveryError {
    message: String,
    provider: &'static str,
    transient: bool,
    original_error: Arc<dyn StdError + Send + Sync + 'static>,
}

impl DeliveryError {
    /// Wrap `cause` as a delivery error for `provider`.
    ///
    /// The message reads `"<display_name> delivery error: <cause>"`.
    pub fn new<E>(provider: &'static str, display_name: &str, cause: E, class: ErrorClass) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: format!("{display_name} delivery error: {cause}"),
            provider,
            transient: class.is_transient(),
            original_error: Arc::new(cause),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Name of the backend that produced this error.
    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns `true` if the caller may retry the delivery.
    pub fn is_transient(&self) -> bool {
        self.transient
    }

    pub fn classification(&self) -> ErrorClass {
        if self.transient {
            ErrorClass::Transient
        } else {
            ErrorClass::Fatal
        }
    }

    /// The underlying cause, for diagnostics.
    pub fn original_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.original_error.as_ref()
    }

    /// Downcast the underlying cause to a concrete backend error type.
    pub fn downcast_original<E: StdError + 'static>(&self) -> Option<&E> {
        self.original_error.downcast_ref::<E>()
    }

    /// Returns `true` if both errors share the very same cause instance.
    pub fn shares_cause_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.original_error, &other.original_error)
    }
}

impl fmt::Debug for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryError")
            .field("message", &self.message)
            .field("provider", &self.provider)
            .field("transient", &self.transient)
            .field("original_error", &self.original_error)
            .finish()
    }
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for DeliveryError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.original_error.as_ref())
    }
}

/// Construction-time configuration failures.
///
/// Raised before any network activity; not part of the delivery taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required setting was absent or blank.
    #[error("missing required setting `{0}`")]
    MissingSetting(&'static str),

    /// No credential in the configuration nor in the fallback variable.
    #[error("no {setting} configured: pass `{setting}` or set the {env_var} environment variable")]
    MissingCredential {
        setting: &'static str,
        env_var: &'static str,
    },

    /// A setting was present but unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn unknown_labels_default_to_fatal() {
        assert_eq!(ErrorClass::from_label("transient"), ErrorClass::Transient);
        assert_eq!(ErrorClass::from_label(" Transient "), ErrorClass::Transient);
        assert_eq!(ErrorClass::from_label("fatal"), ErrorClass::Fatal);
        assert_eq!(ErrorClass::from_label("retry-maybe"), ErrorClass::Fatal);
        assert_eq!(ErrorClass::from_label(""), ErrorClass::Fatal);
        assert_eq!(ErrorClass::default(), ErrorClass::Fatal);
    }

    #[test]
    fn error_class_serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&ErrorClass::Transient).unwrap();
        assert_eq!(json, "\"transient\"");
        let class: ErrorClass = serde_json::from_str("\"fatal\"").unwrap();
        assert_eq!(class, ErrorClass::Fatal);
    }

    #[test]
    fn delivery_error_message_and_flag() {
        let cause = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
        let err = DeliveryError::new("smtp", "SMTP", cause, ErrorClass::Transient);
        assert_eq!(err.message(), "SMTP delivery error: connection refused");
        assert_eq!(err.to_string(), err.message());
        assert_eq!(err.provider(), "smtp");
        assert!(err.is_transient());
        assert_eq!(err.classification(), ErrorClass::Transient);
    }

    #[test]
    fn delivery_error_preserves_original_cause() {
        let cause = io::Error::new(io::ErrorKind::TimedOut, "read timed out");
        let err = DeliveryError::new("sendgrid", "SendGrid", cause, ErrorClass::Transient);
        let original = err.downcast_original::<io::Error>().unwrap();
        assert_eq!(original.kind(), io::ErrorKind::TimedOut);
        assert!(err.source().is_some());
    }

    #[test]
    fn clones_share_the_same_cause() {
        let cause = io::Error::other("boom");
        let err = DeliveryError::new("ses", "SES", cause, ErrorClass::Fatal);
        let clone = err.clone();
        assert!(err.shares_cause_with(&clone));

        let other = DeliveryError::new("ses", "SES", io::Error::other("boom"), ErrorClass::Fatal);
        assert!(!err.shares_cause_with(&other));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::MissingCredential {
            setting: "api_key",
            env_var: "SENDGRID_API_KEY",
        };
        assert_eq!(
            err.to_string(),
            "no api_key configured: pass `api_key` or set the SENDGRID_API_KEY environment variable"
        );
        assert_eq!(
            ConfigError::MissingSetting("region").to_string(),
            "missing required setting `region`"
        );
    }
}
