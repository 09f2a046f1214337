use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while turning caller input into a [`NormalizedEmail`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// A required field was absent, `null`, or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field held a value that cannot be coerced to text.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    /// The loosely typed input was not a JSON object.
    #[error("email message must be a JSON object")]
    NotAnObject,
}

/// An outbound email as supplied by the caller.
///
/// `reply_to` and `html_body` are `None` when not provided; they are never
/// defaulted to an empty string.
///
/// # Examples
///
/// ```
/// use mailgate_core::EmailMessage;
///
/// let email = EmailMessage::new("user@example.com", "noreply@example.com", "Hi", "Hello!")
///     .with_reply_to("support@example.com");
/// let normalized = email.normalize().unwrap();
/// assert_eq!(normalized.reply_to(), Some("support@example.com"));
/// assert!(normalized.html_body().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Recipient email address.
    pub to: String,

    /// Sender email address.
    pub from: String,

    /// Email subject line.
    pub subject: String,

    /// Plain-text body.
    pub text_body: String,

    /// Optional reply-to address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,

    /// Optional HTML body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
}

impl EmailMessage {
    /// Create a message with the four required fields.
    pub fn new(
        to: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
        text_body: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            subject: subject.into(),
            text_body: text_body.into(),
            reply_to: None,
            html_body: None,
        }
    }

    /// Set the reply-to address.
    #[must_use]
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// Set the HTML body.
    #[must_use]
    pub fn with_html_body(mut self, html_body: impl Into<String>) -> Self {
        self.html_body = Some(html_body.into());
        self
    }

    /// Build a message from a loosely typed JSON object.
    ///
    /// Strings, numbers and booleans are coerced to text. `null` on an
    /// optional field means "absent"; arrays and objects are rejected.
    pub fn from_value(value: &Value) -> Result<Self, MessageError> {
        let object = value.as_object().ok_or(MessageError::NotAnObject)?;
        let field = |name: &'static str| match object.get(name) {
            Some(value) => coerce_text(name, value),
            None => Ok(None),
        };
        let required = |name: &'static str| field(name)?.ok_or(MessageError::MissingField(name));

        Ok(Self {
            to: required("to")?,
            from: required("from")?,
            subject: required("subject")?,
            text_body: required("text_body")?,
            reply_to: field("reply_to")?,
            html_body: field("html_body")?,
        })
    }

    /// Validate the message and return a normalized copy.
    ///
    /// The caller's message is left untouched.
    pub fn normalize(&self) -> Result<NormalizedEmail, MessageError> {
        Ok(NormalizedEmail {
            to: require("to", &self.to)?,
            from: require("from", &self.from)?,
            subject: require("subject", &self.subject)?,
            text_body: require("text_body", &self.text_body)?,
            reply_to: self.reply_to.clone(),
            html_body: self.html_body.clone(),
        })
    }
}

/// A validated message handed to a backend's send operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEmail {
    to: String,
    from: String,
    subject: String,
    text_body: String,
    reply_to: Option<String>,
    html_body: Option<String>,
}

impl NormalizedEmail {
    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn from_address(&self) -> &str {
        &self.from
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn text_body(&self) -> &str {
        &self.text_body
    }

    pub fn reply_to(&self) -> Option<&str> {
        self.reply_to.as_deref()
    }

    pub fn html_body(&self) -> Option<&str> {
        self.html_body.as_deref()
    }
}

fn require(field: &'static str, value: &str) -> Result<String, MessageError> {
    if value.trim().is_empty() {
        return Err(MessageError::MissingField(field));
    }
    Ok(value.to_owned())
}

fn coerce_text(field: &'static str, value: &Value) -> Result<Option<String>, MessageError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(MessageError::InvalidField {
            field,
            reason: "expected a text, number or boolean value",
        }),
    }
}
