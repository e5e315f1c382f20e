//! Log command handlers

use anyhow::Result;
use cdm_client::{BackupClient, Session};
use clap::Subcommand;
use colored::*;

/// Log subcommands
#[derive(Subcommand)]
pub enum LogCommands {
    /// Print a job log document by log ID
    Get {
        /// Log ID
        log_id: String,
    },
}

pub async fn handle_log_command(
    command: LogCommands,
    client: &BackupClient,
    session: &Session,
) -> Result<()> {
    match command {
        LogCommands::Get { log_id } => print_log_document(client, session, &log_id).await,
    }
}

pub(crate) async fn print_log_document(
    client: &BackupClient,
    session: &Session,
    log_id: &str,
) -> Result<()> {
    let document = client.get_log(session, log_id).await?;

    println!("{}", format!("Job log {}:", log_id).bold());
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
