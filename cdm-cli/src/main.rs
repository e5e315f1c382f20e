//! CDM CLI
//!
//! Command-line interface for inspecting and starting jobs on a backup
//! appliance.

mod commands;
mod config;

use anyhow::Result;
use cdm_client::Credentials;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "cdm")]
#[command(about = "Copy Data Management job CLI", long_about = None)]
struct Cli {
    /// API base URL
    #[arg(long, env = "CDM_BASE_URL", default_value = "https://localhost:8443/api")]
    base_url: String,

    /// Login user
    #[arg(long, env = "CDM_USERNAME", default_value = "admin")]
    username: String,

    /// Login password
    #[arg(long, env = "CDM_PASSWORD", hide_env_values = true)]
    password: String,

    /// Accept self-signed server certificates
    #[arg(
        long,
        env = "CDM_INSECURE_TLS",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    insecure: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        base_url: cli.base_url,
        credentials: Credentials::new(cli.username, cli.password),
        insecure: cli.insecure,
    };

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insecure(value: &str) -> bool {
        Cli::try_parse_from(["cdm", "--password", "secret", "--insecure", value, "session"])
            .unwrap()
            .insecure
    }

    #[test]
    fn test_insecure_accepts_boolish_values() {
        for value in ["true", "1", "yes", "on"] {
            assert!(insecure(value), "{}", value);
        }
        for value in ["false", "0", "no", "off"] {
            assert!(!insecure(value), "{}", value);
        }
    }

    #[test]
    fn test_insecure_rejects_other_values() {
        assert!(
            Cli::try_parse_from(["cdm", "--password", "secret", "--insecure", "maybe", "session"])
                .is_err()
        );
    }
}
