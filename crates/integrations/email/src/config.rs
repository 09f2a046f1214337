use mailgate_aws::SesConfig;
use mailgate_lettermint::LettermintConfig;
use mailgate_sendgrid::SendGridConfig;
use mailgate_smtp::SmtpConfig;
use serde::{Deserialize, Serialize};

/// Backend selection plus that backend's settings.
///
/// Serialized with a `backend` tag next to the backend's own fields:
///
/// ```
/// use mailgate_email::EmailConfig;
///
/// let config: EmailConfig = serde_json::from_str(
///     r#"{ "backend": "smtp", "host": "smtp.example.com", "port": 2525 }"#,
/// )
/// .unwrap();
/// assert_eq!(config.backend_name(), "smtp");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum EmailConfig {
    Smtp(SmtpConfig),
    SendGrid(SendGridConfig),
    Ses(SesConfig),
    Lettermint(LettermintConfig),
    /// Log messages instead of sending them (local development).
    Log,
}

impl EmailConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Smtp(_) => "smtp",
            Self::SendGrid(_) => "sendgrid",
            Self::Ses(_) => "ses",
            Self::Lettermint(_) => "lettermint",
            Self::Log => "log",
        }
    }
}
