use std::error::Error as StdError;
use std::fmt;
use std::io;

use crate::error::ErrorClass;

/// Low-level connectivity failures shared by every transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkErrorKind {
    ConnectionRefused,
    ConnectionReset,
    Timeout,
    /// Generic I/O failure on the socket.
    Io,
    /// Host name resolution failed.
    Dns,
}

/// Network failures every backend treats as transient.
pub const TRANSIENT_NETWORK_ERRORS: &[NetworkErrorKind] = &[
    NetworkErrorKind::ConnectionRefused,
    NetworkErrorKind::ConnectionReset,
    NetworkErrorKind::Timeout,
    NetworkErrorKind::Io,
    NetworkErrorKind::Dns,
];

impl NetworkErrorKind {
    pub fn classification(self) -> ErrorClass {
        if TRANSIENT_NETWORK_ERRORS.contains(&self) {
            ErrorClass::Transient
        } else {
            ErrorClass::Fatal
        }
    }

    /// Map an I/O error to its network failure kind.
    pub fn from_io_error(error: &io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof => Self::ConnectionReset,
            io::ErrorKind::TimedOut => Self::Timeout,
            _ if looks_like_dns_failure(&error.to_string()) => Self::Dns,
            _ => Self::Io,
        }
    }

    /// Walk an error's source chain looking for a connectivity failure.
    ///
    /// The first `io::Error` found decides the kind. Resolver failures and
    /// elapsed deadlines are recognized by their message, since transports
    /// wrap them in opaque connector or timer errors.
    pub fn from_source_chain(error: &(dyn StdError + 'static)) -> Option<Self> {
        let mut current = Some(error);
        while let Some(err) = current {
            if let Some(io_err) = err.downcast_ref::<io::Error>() {
                return Some(Self::from_io_error(io_err));
            }
            let message = err.to_string();
            if looks_like_dns_failure(&message) {
                return Some(Self::Dns);
            }
            if looks_like_timeout(&message) {
                return Some(Self::Timeout);
            }
            current = err.source();
        }
        None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionRefused => "connection_refused",
            Self::ConnectionReset => "connection_reset",
            Self::Timeout => "timeout",
            Self::Io => "io",
            Self::Dns => "dns",
        }
    }
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend error types implement this so the shared network classification
/// can recognize connectivity failures without knowing the backend.
pub trait TransportError: StdError + Send + Sync + 'static {
    /// The connectivity failure behind this error, if it is one.
    fn network_kind(&self) -> Option<NetworkErrorKind> {
        None
    }
}

impl TransportError for std::convert::Infallible {}

/// Derive the network failure kind of a `reqwest` error.
///
/// Returns `None` for errors that happened after a response arrived
/// (decoding, redirects) or while building the request.
#[cfg(feature = "http")]
pub fn reqwest_network_kind(error: &reqwest::Error) -> Option<NetworkErrorKind> {
    if error.is_timeout() {
        return Some(NetworkErrorKind::Timeout);
    }
    if error.is_connect() {
        return Some(
            NetworkErrorKind::from_source_chain(error)
                .unwrap_or(NetworkErrorKind::ConnectionRefused),
        );
    }
    if error.is_request() || error.is_body() {
        return Some(NetworkErrorKind::from_source_chain(error).unwrap_or(NetworkErrorKind::Io));
    }
    None
}

fn looks_like_dns_failure(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("dns error")
        || lower.contains("failed to lookup address")
        || lower.contains("name or service not known")
        || lower.contains("no such host")
        || lower.contains("nodename nor servname")
}

fn looks_like_timeout(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("timed out") || lower.contains("deadline has elapsed")
}

#[cfg(test)]
mod tests {
    use thiserror::Error;

    use super::*;

    #[derive(Debug, Error)]
    #[error("client error (Connect)")]
    struct Wrapper(#[source] io::Error);

    #[derive(Debug, Error)]
    #[error("dns error")]
    struct ResolverError;

    #[test]
    fn every_network_kind_is_transient() {
        for kind in TRANSIENT_NETWORK_ERRORS {
            assert_eq!(kind.classification(), ErrorClass::Transient, "{kind}");
        }
    }

    #[test]
    fn io_error_kinds() {
        let cases = [
            (io::ErrorKind::ConnectionRefused, NetworkErrorKind::ConnectionRefused),
            (io::ErrorKind::ConnectionReset, NetworkErrorKind::ConnectionReset),
            (io::ErrorKind::BrokenPipe, NetworkErrorKind::ConnectionReset),
            (io::ErrorKind::TimedOut, NetworkErrorKind::Timeout),
            (io::ErrorKind::WouldBlock, NetworkErrorKind::Io),
            (io::ErrorKind::PermissionDenied, NetworkErrorKind::Io),
        ];
        for (io_kind, expected) in cases {
            let err = io::Error::new(io_kind, "socket failure");
            assert_eq!(NetworkErrorKind::from_io_error(&err), expected);
        }
    }

    #[test]
    fn io_error_with_resolver_message_is_dns() {
        let err = io::Error::other("failed to lookup address information: Name or service not known");
        assert_eq!(NetworkErrorKind::from_io_error(&err), NetworkErrorKind::Dns);
    }

    #[test]
    fn source_chain_finds_nested_io_error() {
        let err = Wrapper(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"));
        assert_eq!(
            NetworkErrorKind::from_source_chain(&err),
            Some(NetworkErrorKind::ConnectionReset)
        );
    }

    #[test]
    fn source_chain_recognizes_resolver_failures() {
        assert_eq!(
            NetworkErrorKind::from_source_chain(&ResolverError),
            Some(NetworkErrorKind::Dns)
        );
    }

    #[test]
    fn source_chain_recognizes_elapsed_deadlines() {
        #[derive(Debug, Error)]
        #[error("network error")]
        struct Network(#[source] Elapsed);

        #[derive(Debug, Error)]
        #[error("deadline has elapsed")]
        struct Elapsed;

        assert_eq!(
            NetworkErrorKind::from_source_chain(&Network(Elapsed)),
            Some(NetworkErrorKind::Timeout)
        );
    }

    #[test]
    fn source_chain_without_network_cause() {
        let err = std::fmt::Error;
        assert_eq!(NetworkErrorKind::from_source_chain(&err), None);
    }
}
