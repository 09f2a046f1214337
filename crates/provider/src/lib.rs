//! Delivery contract and error taxonomy for Mailgate backends.
//!
//! Every transport implements [`EmailBackend`]. Callers see one error type,
//! [`DeliveryError`], whose `transient` flag drives retry decisions, no
//! matter which backend produced it.

pub mod backend;
pub mod error;
pub mod log;
pub mod network;

pub use backend::{BackendError, DynEmailBackend, EmailBackend, NotImplementedError};
pub use error::{ConfigError, DeliveryError, ErrorClass};
pub use log::{LogBackend, NullBackend};
pub use network::{NetworkErrorKind, TRANSIENT_NETWORK_ERRORS, TransportError};

#[cfg(feature = "http")]
pub use network::reqwest_network_kind;

/// Resolve a credential from an explicit value or a fallback variable.
///
/// Blank values count as absent. `lookup` is usually `std::env::var`, but
/// tests pass a closure so the process environment stays untouched.
pub fn resolve_credential(
    explicit: Option<&str>,
    setting: &'static str,
    env_var: &'static str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    explicit
        .map(str::to_owned)
        .filter(|value| !value.trim().is_empty())
        .or_else(|| lookup(env_var).filter(|value| !value.trim().is_empty()))
        .ok_or(ConfigError::MissingCredential { setting, env_var })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_credential_wins() {
        let key = resolve_credential(Some("explicit"), "api_key", "KEY", |_| {
            Some("from-env".to_owned())
        })
        .unwrap();
        assert_eq!(key, "explicit");
    }

    #[test]
    fn blank_credential_falls_back_to_env() {
        let key = resolve_credential(Some("  "), "api_key", "KEY", |name| {
            (name == "KEY").then(|| "from-env".to_owned())
        })
        .unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn missing_everywhere_fails() {
        let err = resolve_credential(None, "api_token", "TOKEN", |_| None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingCredential {
                setting: "api_token",
                env_var: "TOKEN",
            }
        );
    }
}
