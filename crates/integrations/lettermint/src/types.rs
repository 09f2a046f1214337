use std::collections::BTreeMap;

use mailgate_core::NormalizedEmail;
use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/send`.
#[derive(Debug, Clone, Serialize)]
pub struct SendEmailRequest {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Vec<String>>,
}

impl From<&NormalizedEmail> for SendEmailRequest {
    fn from(email: &NormalizedEmail) -> Self {
        Self {
            from: email.from_address().to_owned(),
            to: vec![email.to().to_owned()],
            subject: email.subject().to_owned(),
            text: email.text_body().to_owned(),
            html: email.html_body().map(str::to_owned),
            reply_to: email.reply_to().map(|r| vec![r.to_owned()]),
        }
    }
}

/// Successful send response.
#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailResponse {
    pub message_id: String,
    pub status: String,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use mailgate_core::EmailMessage;

    use super::*;

    #[test]
    fn reply_to_is_omitted_when_absent() {
        let email = EmailMessage::new("user@example.com", "noreply@example.com", "Hi", "Hello")
            .normalize()
            .unwrap();
        let body = serde_json::to_value(SendEmailRequest::from(&email)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "from": "noreply@example.com",
                "to": ["user@example.com"],
                "subject": "Hi",
                "text": "Hello"
            })
        );
    }

    #[test]
    fn reply_to_and_html_when_present() {
        let email = EmailMessage::new("user@example.com", "noreply@example.com", "Hi", "Hello")
            .with_reply_to("support@example.com")
            .with_html_body("<b>Hello</b>")
            .normalize()
            .unwrap();
        let request = SendEmailRequest::from(&email);
        assert_eq!(request.reply_to, Some(vec!["support@example.com".to_owned()]));
        assert_eq!(request.html.as_deref(), Some("<b>Hello</b>"));
    }

    #[test]
    fn error_body_tolerates_missing_fields() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message.is_none());
        assert!(body.errors.is_empty());

        let body: ErrorBody = serde_json::from_str(
            r#"{"message":"The given data was invalid.","errors":{"to":["The to field is required."]}}"#,
        )
        .unwrap();
        assert_eq!(body.errors["to"], vec!["The to field is required."]);
    }
}
