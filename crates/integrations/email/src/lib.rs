//! Mailgate facade.
//!
//! [`EmailConfig`] selects one backend (SMTP, SendGrid, SES, Lettermint or
//! the logging backend) and [`Mailer`] delivers through it behind the
//! shared delivery contract.

pub mod config;
pub mod mailer;

pub use config::EmailConfig;
pub use mailer::Mailer;

pub use mailgate_core::{DeliveryReceipt, EmailMessage};
pub use mailgate_provider::{ConfigError, DeliveryError, ErrorClass};
