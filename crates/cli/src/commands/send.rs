use std::path::Path;

use clap::Args;
use mailgate_email::{DeliveryReceipt, EmailMessage, Mailer};
use tracing::debug;

use crate::OutputFormat;
use crate::commands::{ConfigFileError, load_config};

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Recipient address.
    #[arg(long, required_unless_present = "message")]
    pub to: Option<String>,
    /// Sender address.
    #[arg(long, required_unless_present = "message")]
    pub from: Option<String>,
    /// Subject line.
    #[arg(long, required_unless_present = "message")]
    pub subject: Option<String>,
    /// Plain-text body.
    #[arg(long, required_unless_present = "message")]
    pub text: Option<String>,
    /// HTML body.
    #[arg(long)]
    pub html: Option<String>,
    /// Reply-To address.
    #[arg(long)]
    pub reply_to: Option<String>,
    /// Whole message as a JSON object (string or @file path).
    #[arg(long, conflicts_with_all = ["to", "from", "subject", "text", "html", "reply_to"])]
    pub message: Option<String>,
}

impl SendArgs {
    fn to_message(&self) -> EmailMessage {
        let mut email = EmailMessage::new(
            self.to.clone().unwrap_or_default(),
            self.from.clone().unwrap_or_default(),
            self.subject.clone().unwrap_or_default(),
            self.text.clone().unwrap_or_default(),
        );
        email.html_body.clone_from(&self.html);
        email.reply_to.clone_from(&self.reply_to);
        email
    }
}

fn read_json(raw: &str) -> anyhow::Result<serde_json::Value> {
    let value = if let Some(path) = raw.strip_prefix('@') {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)?
    } else {
        serde_json::from_str(raw)?
    };
    Ok(value)
}

pub async fn run(config_path: &Path, args: &SendArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mailer = Mailer::from_config(config).map_err(ConfigFileError::from)?;
    debug!(provider = mailer.provider_name(), "sending one message");

    let receipt = match &args.message {
        Some(raw) => mailer.deliver_value(&read_json(raw)?).await?,
        None => mailer.deliver(&args.to_message()).await?,
    };

    print_receipt(&receipt, format)
}

fn print_receipt(receipt: &DeliveryReceipt, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(receipt)?);
        }
        OutputFormat::Text => {
            println!(
                "delivered via {}: status={} message_id={}",
                receipt.provider,
                receipt.status,
                receipt.message_id.as_deref().unwrap_or("-")
            );
        }
    }
    Ok(())
}
