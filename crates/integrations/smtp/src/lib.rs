//! SMTP backend for Mailgate.
//!
//! Delivers through [`lettre`]'s async SMTP transport and classifies
//! failures by reply code. An authentication failure with configured
//! credentials triggers one unauthenticated fallback attempt.

pub mod backend;
pub mod config;
pub mod error;
pub mod message;
pub mod transport;

pub use backend::SmtpBackend;
pub use config::{Encryption, SmtpConfig};
pub use error::{AUTH_FAILURE_CODES, SYNTAX_ERROR_CODES, SmtpError};
pub use message::build_message;
pub use transport::{AuthMode, LettreSubmitter, SmtpSubmitter};
