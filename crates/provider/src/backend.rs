use std::future::Future;

use async_trait::async_trait;
use mailgate_core::{DeliveryReceipt, EmailMessage, NormalizedEmail, obscure_email};
use thiserror::Error;
use tracing::{Instrument, debug, error, info, info_span};

use crate::error::{DeliveryError, ErrorClass};
use crate::network::TransportError;

/// Raised when a backend never provided its own send operation.
#[derive(Debug, Clone, Error)]
#[error("perform_delivery is not implemented for the `{0}` backend")]
pub struct NotImplementedError(pub &'static str);

/// Failure of a backend's send operation, before normalization into a
/// [`DeliveryError`].
#[derive(Debug, Error)]
pub enum BackendError<E> {
    /// An already-classified error, returned to the caller unchanged.
    #[error(transparent)]
    Delivery(DeliveryError),

    /// A backend-specific failure that still needs classification.
    #[error(transparent)]
    Transport(E),

    /// The backend does not implement `perform_delivery`.
    #[error(transparent)]
    NotImplemented(NotImplementedError),
}

/// The delivery contract every transport implements.
///
/// Backends supply [`perform_delivery`](Self::perform_delivery) and their
/// static classification table in [`classify_error`](Self::classify_error).
/// Callers use [`deliver`](Self::deliver), which normalizes the message,
/// funnels every failure through the shared classification, and logs.
///
/// This trait is **not** object-safe; use [`DynEmailBackend`] for dynamic
/// dispatch. Every `EmailBackend` implements it through a blanket impl.
pub trait EmailBackend: Send + Sync + std::fmt::Debug {
    /// The backend's own failure type.
    type Error: TransportError;

    /// Short machine name, e.g. `"smtp"`.
    fn provider_name(&self) -> &'static str;

    /// Name used in error messages, e.g. `"SMTP"`.
    fn display_name(&self) -> &'static str {
        EmailBackend::provider_name(self)
    }

    /// Send one normalized message through the backend's transport.
    fn perform_delivery(
        &self,
        _email: &NormalizedEmail,
    ) -> impl Future<Output = Result<DeliveryReceipt, BackendError<Self::Error>>> + Send {
        let provider = EmailBackend::provider_name(self);
        async move { Err(BackendError::NotImplemented(NotImplementedError(provider))) }
    }

    /// The backend's classification table. Unknown shapes must be fatal.
    fn classify_error(&self, error: &Self::Error) -> ErrorClass;

    /// Classify a backend error, recognizing shared network failures first.
    fn classify(&self, error: &Self::Error) -> ErrorClass {
        match error.network_kind() {
            Some(kind) => kind.classification(),
            None => self.classify_error(error),
        }
    }

    /// Wrap a backend error into a classified [`DeliveryError`].
    fn wrap_error(&self, error: Self::Error) -> DeliveryError {
        let class = self.classify(&error);
        let provider = EmailBackend::provider_name(self);
        DeliveryError::new(provider, EmailBackend::display_name(self), error, class)
    }

    /// Normalize `email`, send it, and classify any failure.
    fn deliver(
        &self,
        email: &EmailMessage,
    ) -> impl Future<Output = Result<DeliveryReceipt, DeliveryError>> + Send {
        let provider = EmailBackend::provider_name(self);
        let display_name = EmailBackend::display_name(self);
        let span = info_span!("deliver", provider);
        async move {
            let normalized = match email.normalize() {
                Ok(normalized) => normalized,
                Err(e) => {
                    let err = DeliveryError::new(provider, display_name, e, ErrorClass::Fatal);
                    error!(error = %err, classification = %ErrorClass::Fatal, "email rejected before delivery");
                    return Err(err);
                }
            };

            let recipient = obscure_email(normalized.to());
            debug!(to = %recipient, "delivering email");

            let err = match self.perform_delivery(&normalized).await {
                Ok(receipt) => {
                    info!(
                        to = %recipient,
                        message_id = receipt.message_id.as_deref().unwrap_or("-"),
                        status = %receipt.status,
                        "email delivered"
                    );
                    return Ok(receipt);
                }
                Err(BackendError::Delivery(err)) => err,
                Err(BackendError::Transport(cause)) => self.wrap_error(cause),
                Err(BackendError::NotImplemented(cause)) => {
                    DeliveryError::new(provider, display_name, cause, ErrorClass::Fatal)
                }
            };

            error!(
                to = %recipient,
                error = %err,
                classification = %err.classification(),
                "email delivery failed"
            );
            Err(err)
        }
        .instrument(span)
    }
}

/// Object-safe delivery trait for use behind `Box<dyn DynEmailBackend>`.
///
/// You generally should not implement this trait directly; implement
/// [`EmailBackend`] and rely on the blanket implementation.
#[async_trait]
pub trait DynEmailBackend: Send + Sync + std::fmt::Debug {
    fn provider_name(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    async fn deliver(&self, email: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError>;
}

#[async_trait]
impl<T: EmailBackend> DynEmailBackend for T {
    fn provider_name(&self) -> &'static str {
        EmailBackend::provider_name(self)
    }

    fn display_name(&self) -> &'static str {
        EmailBackend::display_name(self)
    }

    async fn deliver(&self, email: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        EmailBackend::deliver(self, email).await
    }
}
