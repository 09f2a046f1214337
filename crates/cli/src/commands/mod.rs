pub mod check;
pub mod send;

use std::path::{Path, PathBuf};

use mailgate_email::{ConfigError, DeliveryError, EmailConfig};
use thiserror::Error;

/// `sysexits.h` code for a failure worth retrying later.
pub const EX_TEMPFAIL: u8 = 75;

/// `sysexits.h` code for a configuration error.
pub const EX_CONFIG: u8 = 78;

/// Failures while loading the configuration or building the backend.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Backend(#[from] ConfigError),
}

/// Load a TOML [`EmailConfig`] from `path`.
pub fn load_config(path: &Path) -> Result<EmailConfig, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_owned(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigFileError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Process exit status for a failed command.
pub fn exit_status(err: &anyhow::Error) -> u8 {
    if let Some(delivery) = err.downcast_ref::<DeliveryError>() {
        return if delivery.is_transient() { EX_TEMPFAIL } else { 1 };
    }
    if err.downcast_ref::<ConfigFileError>().is_some()
        || err.downcast_ref::<ConfigError>().is_some()
    {
        return EX_CONFIG;
    }
    1
}

#[cfg(test)]
mod tests {
    use mailgate_email::ErrorClass;

    use super::*;

    fn temp_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("mailgate-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn delivery_errors_map_by_classification() {
        let transient = DeliveryError::new(
            "smtp",
            "SMTP",
            std::io::Error::other("busy"),
            ErrorClass::Transient,
        );
        assert_eq!(exit_status(&anyhow::Error::new(transient)), EX_TEMPFAIL);

        let fatal = DeliveryError::new("smtp", "SMTP", std::io::Error::other("no"), ErrorClass::Fatal);
        assert_eq!(exit_status(&anyhow::Error::new(fatal)), 1);
    }

    #[test]
    fn config_errors_map_to_ex_config() {
        let err = anyhow::Error::new(ConfigFileError::from(ConfigError::MissingSetting("host")));
        assert_eq!(exit_status(&err), EX_CONFIG);

        let missing = load_config(Path::new("/nonexistent/mailgate.toml")).unwrap_err();
        assert!(matches!(missing, ConfigFileError::Read { .. }));
        assert_eq!(exit_status(&anyhow::Error::new(missing)), EX_CONFIG);
    }

    #[test]
    fn other_errors_are_generic_failures() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_status(&err), 1);
    }

    #[test]
    fn loads_toml_config() {
        let path = temp_config("load", "backend = \"smtp\"\nhost = \"smtp.example.com\"\n");
        let config = load_config(&path).unwrap();
        assert_eq!(config.backend_name(), "smtp");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let path = temp_config("parse", "backend = \"fax\"\n");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigFileError::Parse { .. }));
        std::fs::remove_file(path).unwrap();
    }
}
