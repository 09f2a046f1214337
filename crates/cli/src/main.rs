//! Mailgate CLI
//!
//! Sends one email through the configured backend and exits with a
//! retry-aware status code: `0` delivered, `75` transient failure (retry
//! later), `1` fatal failure, `78` configuration error.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

/// Mailgate CLI: send transactional email through a configured backend.
#[derive(Parser, Debug)]
#[command(name = "mailgate", version, about)]
struct Cli {
    /// Backend configuration file (TOML).
    #[arg(
        long,
        env = "MAILGATE_CONFIG",
        default_value = "mailgate.toml",
        global = true
    )]
    config: PathBuf,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send one email.
    Send(commands::send::SendArgs),
    /// Validate the configuration and build the backend without sending.
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Send(ref args) => commands::send::run(&cli.config, args, &cli.format).await,
        Command::Check => commands::check::run(&cli.config, &cli.format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(commands::exit_status(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_with_fields() {
        let cli = Cli::try_parse_from([
            "mailgate",
            "--config",
            "prod.toml",
            "send",
            "--to",
            "user@example.com",
            "--from",
            "noreply@example.com",
            "--subject",
            "Hi",
            "--text",
            "Hello",
            "--reply-to",
            "support@example.com",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("prod.toml"));
        assert!(matches!(cli.format, OutputFormat::Json));
        let Command::Send(args) = cli.command else {
            panic!("expected send");
        };
        assert_eq!(args.reply_to.as_deref(), Some("support@example.com"));
        assert!(args.html.is_none());
    }

    #[test]
    fn send_requires_fields_without_message() {
        let result = Cli::try_parse_from(["mailgate", "send", "--to", "user@example.com"]);
        assert!(result.is_err());
    }

    #[test]
    fn message_conflicts_with_fields() {
        let result = Cli::try_parse_from([
            "mailgate",
            "send",
            "--message",
            "{}",
            "--to",
            "user@example.com",
        ]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["mailgate", "send", "--message", "@mail.json"]).unwrap();
        assert!(matches!(cli.command, Command::Send(_)));
    }
}
