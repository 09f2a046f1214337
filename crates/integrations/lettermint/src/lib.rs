//! Lettermint backend for Mailgate.
//!
//! [`LettermintClient`] is a small typed client for the Lettermint send
//! API: every outcome is a [`SendEmailResponse`] or one variant of the
//! closed [`LettermintError`] union. [`LettermintBackend`] adapts it to the
//! delivery contract and classifies by variant.

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use backend::LettermintBackend;
pub use client::{LettermintClient, TOKEN_HEADER};
pub use config::{API_TOKEN_ENV, ClientOptions, DEFAULT_BASE_URL, LettermintConfig};
pub use error::LettermintError;
pub use types::{SendEmailRequest, SendEmailResponse};
