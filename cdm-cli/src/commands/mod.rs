//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod log;
mod menu;
mod policy;
mod session;

pub use job::JobCommands;
pub use log::LogCommands;
pub use policy::PolicyCommands;

use anyhow::{Context, Result};
use cdm_client::{BackupClient, Session};
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Log in and print the session ID
    Session,
    /// Job management
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// SLA policy listing
    Policy {
        #[command(subcommand)]
        command: PolicyCommands,
    },
    /// Job log documents
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
    /// Interactive menu
    Menu,
}

/// Handle a CLI command
///
/// Logs in once, then routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let (client, session) = connect(config).await?;

    match command {
        Commands::Session => session::print_session(&session),
        Commands::Job { command } => job::handle_job_command(command, &client, &session).await,
        Commands::Policy { command } => {
            policy::handle_policy_command(command, &client, &session).await
        }
        Commands::Log { command } => log::handle_log_command(command, &client, &session).await,
        Commands::Menu => menu::run_menu(&client, &session).await,
    }
}

/// Build a client and log in
async fn connect(config: &Config) -> Result<(BackupClient, Session)> {
    let client = config.client()?;
    let session = client
        .login(&config.credentials)
        .await
        .context("Failed to authenticate")?;
    Ok((client, session))
}

/// Render an optional JSON field the way the appliance UI does
fn display_value(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => "-".to_string(),
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Render a millisecond epoch timestamp, falling back to the raw value
fn display_time(value: Option<&serde_json::Value>) -> String {
    value
        .and_then(serde_json::Value::as_i64)
        .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| display_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(None), "-");
        assert_eq!(display_value(Some(&json!(null))), "-");
        assert_eq!(display_value(Some(&json!("ok"))), "ok");
        assert_eq!(display_value(Some(&json!(42))), "42");
    }

    #[test]
    fn test_display_time() {
        assert_eq!(
            display_time(Some(&json!(1700000000000_i64))),
            "2023-11-14 22:13:20"
        );
        assert_eq!(display_time(Some(&json!("yesterday"))), "yesterday");
        assert_eq!(display_time(None), "-");
    }
}
