//! Core message types for the Mailgate email delivery gateway.
//!
//! Every backend consumes the same [`NormalizedEmail`] and produces the same
//! [`DeliveryReceipt`], whichever transport carries the message.

pub mod message;
pub mod privacy;
pub mod receipt;

pub use message::{EmailMessage, MessageError, NormalizedEmail};
pub use privacy::obscure_email;
pub use receipt::DeliveryReceipt;
