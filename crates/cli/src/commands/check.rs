use std::path::Path;

use mailgate_email::Mailer;

use crate::OutputFormat;
use crate::commands::{ConfigFileError, load_config};

pub fn run(config_path: &Path, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mailer = Mailer::from_config(config).map_err(ConfigFileError::from)?;

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({ "backend": mailer.provider_name(), "status": "ok" });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            println!("configuration ok: backend {}", mailer.provider_name());
        }
    }
    Ok(())
}
