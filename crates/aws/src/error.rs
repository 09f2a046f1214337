use mailgate_provider::{ErrorClass, NetworkErrorKind, TransportError};
use thiserror::Error;

/// SES error codes worth retrying.
pub const TRANSIENT_ERROR_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "TooManyRequestsException",
    "ServiceUnavailable",
    "InternalFailure",
    "RequestTimeout",
];

/// SES error codes that will fail the same way on every retry.
pub const FATAL_ERROR_CODES: &[&str] = &[
    "MessageRejected",
    "MailFromDomainNotVerifiedException",
    "AccountSuspendedException",
    "SendingPausedException",
    "AccountSendingPausedException",
    "NotFoundException",
    "BadRequestException",
    "InvalidParameterValue",
    "InvalidClientTokenId",
    "SignatureDoesNotMatch",
    "AccessDeniedException",
    "LimitExceededException",
    "ConfigurationSetDoesNotExistException",
];

/// Errors specific to the SES backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SesError {
    /// SES answered with an error response.
    #[error("{code} (HTTP {status}): {message}")]
    Service {
        code: String,
        message: String,
        status: u16,
    },

    /// The request never got an answer.
    #[error("network error ({kind}): {message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },

    /// The request could not be built, or the response could not be read.
    #[error("request error: {0}")]
    Request(String),
}

impl TransportError for SesError {
    fn network_kind(&self) -> Option<NetworkErrorKind> {
        match self {
            Self::Network { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Classify an SES error by code, then by HTTP status.
pub fn classify_ses_error(error: &SesError) -> ErrorClass {
    match error {
        SesError::Service { code, status, .. } => {
            if TRANSIENT_ERROR_CODES.contains(&code.as_str()) {
                ErrorClass::Transient
            } else if FATAL_ERROR_CODES.contains(&code.as_str()) {
                ErrorClass::Fatal
            } else if *status == 429 || *status >= 500 {
                ErrorClass::Transient
            } else {
                ErrorClass::Fatal
            }
        }
        SesError::Network { kind, .. } => kind.classification(),
        SesError::Request(_) => ErrorClass::Fatal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(code: &str, status: u16) -> SesError {
        SesError::Service {
            code: code.to_owned(),
            message: "test".to_owned(),
            status,
        }
    }

    #[test]
    fn known_transient_codes() {
        for code in TRANSIENT_ERROR_CODES {
            assert_eq!(classify_ses_error(&service(code, 400)), ErrorClass::Transient, "{code}");
        }
    }

    #[test]
    fn known_fatal_codes_win_over_status() {
        for code in FATAL_ERROR_CODES {
            assert_eq!(classify_ses_error(&service(code, 503)), ErrorClass::Fatal, "{code}");
        }
    }

    #[test]
    fn unknown_codes_fall_back_to_status() {
        assert_eq!(classify_ses_error(&service("SomethingNew", 503)), ErrorClass::Transient);
        assert_eq!(classify_ses_error(&service("SomethingNew", 500)), ErrorClass::Transient);
        assert_eq!(classify_ses_error(&service("SomethingNew", 429)), ErrorClass::Transient);
        assert_eq!(classify_ses_error(&service("SomethingNew", 403)), ErrorClass::Fatal);
        assert_eq!(classify_ses_error(&service("SomethingNew", 400)), ErrorClass::Fatal);
        assert_eq!(classify_ses_error(&service("SomethingNew", 302)), ErrorClass::Fatal);
    }

    #[test]
    fn request_errors_are_fatal() {
        assert_eq!(
            classify_ses_error(&SesError::Request("bad body".to_owned())),
            ErrorClass::Fatal
        );
    }

    #[test]
    fn service_error_display() {
        assert_eq!(
            service("MessageRejected", 400).to_string(),
            "MessageRejected (HTTP 400): test"
        );
    }
}
