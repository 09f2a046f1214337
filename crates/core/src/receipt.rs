use serde::{Deserialize, Serialize};

/// Result of a successful delivery through one backend.
///
/// The content is backend-specific: SMTP relays report no message id, HTTP
/// providers return their own identifier and status text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Name of the backend that accepted the message (e.g. `"smtp"`).
    pub provider: String,

    /// Provider-assigned message identifier, if one was returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Human-readable status reported by the provider (e.g. `"queued"`).
    pub status: String,
}

impl DeliveryReceipt {
    /// Create a receipt without a message identifier.
    pub fn new(provider: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message_id: None,
            status: status.into(),
        }
    }

    /// Attach the provider's message identifier.
    #[must_use]
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }
}
