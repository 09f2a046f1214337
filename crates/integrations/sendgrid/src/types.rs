use mailgate_core::NormalizedEmail;
use serde::Serialize;

/// Request body for `POST /v3/mail/send`.
#[derive(Debug, Serialize)]
pub struct MailSendRequest {
    pub personalizations: Vec<Personalization>,
    pub from: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Address>,
    pub subject: String,
    pub content: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Personalization {
    pub to: Vec<Address>,
}

#[derive(Debug, Serialize)]
pub struct Address {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub value: String,
}

impl Address {
    fn new(email: &str) -> Self {
        Self {
            email: email.to_owned(),
        }
    }
}

impl From<&NormalizedEmail> for MailSendRequest {
    fn from(email: &NormalizedEmail) -> Self {
        let mut content = vec![Content {
            content_type: "text/plain",
            value: email.text_body().to_owned(),
        }];
        if let Some(html) = email.html_body() {
            content.push(Content {
                content_type: "text/html",
                value: html.to_owned(),
            });
        }

        Self {
            personalizations: vec![Personalization {
                to: vec![Address::new(email.to())],
            }],
            from: Address::new(email.from_address()),
            reply_to: email.reply_to().map(Address::new),
            subject: email.subject().to_owned(),
            content,
        }
    }
}
