use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use mailgate_core::NormalizedEmail;

use crate::error::SmtpError;

/// Build the MIME message for a normalized email.
///
/// Plain text only, or `multipart/alternative` when an HTML body is
/// present. `Reply-To` is set only when the caller provided one.
pub fn build_message(email: &NormalizedEmail) -> Result<Message, SmtpError> {
    let from = parse_mailbox("from", email.from_address())?;
    let to = parse_mailbox("to", email.to())?;

    let mut builder = Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject());

    if let Some(reply_to) = email.reply_to() {
        builder = builder.reply_to(parse_mailbox("reply-to", reply_to)?);
    }

    let built = match email.html_body() {
        Some(html) => builder.multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(email.text_body().to_owned()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html.to_owned()),
                ),
        ),
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.text_body().to_owned()),
    };

    built.map_err(|e| SmtpError::Message(format!("failed to build email: {e}")))
}

fn parse_mailbox(field: &str, address: &str) -> Result<Mailbox, SmtpError> {
    address
        .parse()
        .map_err(|e| SmtpError::Message(format!("invalid {field} address `{address}`: {e}")))
}
