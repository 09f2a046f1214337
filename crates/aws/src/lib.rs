//! AWS backends for Mailgate.
//!
//! - **SES** (`ses` feature) sends email through the SES v2 `SendEmail` API.
//!
//! [`AwsBaseConfig`](config::AwsBaseConfig) carries the region, static
//! credentials and endpoint override shared by AWS clients.

pub mod config;
pub mod error;

#[cfg(feature = "ses")]
pub mod ses;

pub use config::AwsBaseConfig;
pub use error::{FATAL_ERROR_CODES, SesError, TRANSIENT_ERROR_CODES, classify_ses_error};

#[cfg(feature = "ses")]
pub use ses::{SesBackend, SesConfig};
