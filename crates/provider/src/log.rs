use mailgate_core::{DeliveryReceipt, NormalizedEmail, obscure_email};
use tracing::info;

use crate::backend::{BackendError, EmailBackend};
use crate::error::ErrorClass;

/// A backend that logs the message and reports success without performing
/// any external I/O.
///
/// Useful for local development and for wiring tests where no real
/// transport is available.
#[derive(Debug, Clone, Default)]
pub struct LogBackend;

impl LogBackend {
    pub fn new() -> Self {
        Self
    }
}

impl EmailBackend for LogBackend {
    type Error = std::convert::Infallible;

    fn provider_name(&self) -> &'static str {
        "log"
    }

    async fn perform_delivery(
        &self,
        email: &NormalizedEmail,
    ) -> Result<DeliveryReceipt, BackendError<Self::Error>> {
        info!(
            to = %obscure_email(email.to()),
            subject = %email.subject(),
            has_html = email.html_body().is_some(),
            "log backend accepted email"
        );
        Ok(DeliveryReceipt::new("log", "logged"))
    }

    fn classify_error(&self, error: &Self::Error) -> ErrorClass {
        match *error {}
    }
}

/// A backend that never implemented its send operation.
///
/// Every delivery fails fatally with a "not implemented" error. It exists to
/// exercise the delivery contract itself.
#[derive(Debug, Clone, Default)]
pub struct NullBackend;

impl EmailBackend for NullBackend {
    type Error = std::convert::Infallible;

    fn provider_name(&self) -> &'static str {
        "null"
    }

    fn classify_error(&self, error: &Self::Error) -> ErrorClass {
        match *error {}
    }
}
