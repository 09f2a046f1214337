use mailgate_provider::{NetworkErrorKind, TransportError};
use thiserror::Error;

/// Reply codes that mean the server refused our credentials.
pub const AUTH_FAILURE_CODES: &[u16] = &[530, 534, 535, 538];

/// Reply codes for command syntax and sequencing errors.
pub const SYNTAX_ERROR_CODES: &[u16] = &[500, 501, 502, 503, 504];

/// Errors produced by the SMTP backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmtpError {
    /// The server rejected authentication, or no usable auth mechanism
    /// could be negotiated.
    #[error("authentication failed: {message}")]
    Authentication { code: Option<u16>, message: String },

    /// The server reported a command syntax error.
    #[error("syntax error ({code}): {message}")]
    Syntax { code: u16, message: String },

    /// Permanent rejection (mailbox unavailable, policy, relay denied).
    #[error("rejected ({code}): {message}")]
    Rejected { code: u16, message: String },

    /// Temporary refusal; the server asks the client to come back later.
    #[error("server busy ({code}): {message}")]
    Busy { code: u16, message: String },

    #[error("timed out: {0}")]
    Timeout(String),

    /// Connection-level failure below the SMTP dialogue.
    #[error("network error ({kind}): {message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },

    #[error("TLS error: {0}")]
    Tls(String),

    /// The message could not be built (bad address, bad header).
    #[error("invalid message: {0}")]
    Message(String),

    #[error("{0}")]
    Other(String),
}

impl SmtpError {
    /// Classify a negative SMTP reply by its code.
    pub fn from_reply(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if AUTH_FAILURE_CODES.contains(&code) {
            Self::Authentication {
                code: Some(code),
                message,
            }
        } else if SYNTAX_ERROR_CODES.contains(&code) {
            Self::Syntax { code, message }
        } else if (500..600).contains(&code) {
            Self::Rejected { code, message }
        } else if (400..500).contains(&code) {
            Self::Busy { code, message }
        } else {
            Self::Other(format!("unexpected reply {code}: {message}"))
        }
    }

    /// Convert a `lettre` transport error.
    ///
    /// Server replies are classified by code. Errors without a reply are
    /// inspected for a connectivity cause, then for client-side auth and
    /// TLS failures.
    pub fn from_lettre(error: &lettre::transport::smtp::Error) -> Self {
        let message = error.to_string();

        if let Some(code) = error
            .status()
            .and_then(|code| code.to_string().parse::<u16>().ok())
        {
            return Self::from_reply(code, message);
        }

        if let Some(kind) = NetworkErrorKind::from_source_chain(error) {
            return match kind {
                NetworkErrorKind::Timeout => Self::Timeout(message),
                kind => Self::Network { kind, message },
            };
        }

        let lower = message.to_lowercase();
        if error.is_client() && lower.contains("authentication") {
            Self::Authentication {
                code: None,
                message,
            }
        } else if lower.contains("tls") || lower.contains("certificate") {
            Self::Tls(message)
        } else {
            Self::Other(message)
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// The SMTP reply code behind this error, when the server sent one.
    pub fn reply_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { code, .. } => *code,
            Self::Syntax { code, .. } | Self::Rejected { code, .. } | Self::Busy { code, .. } => {
                Some(*code)
            }
            _ => None,
        }
    }
}

impl TransportError for SmtpError {
    fn network_kind(&self) -> Option<NetworkErrorKind> {
        match self {
            Self::Timeout(_) => Some(NetworkErrorKind::Timeout),
            Self::Network { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
