//! SLA policy command handlers

use anyhow::Result;
use cdm_client::{BackupClient, Session};
use cdm_core::domain::policy::StoragePolicy;
use clap::Subcommand;
use colored::*;

/// Policy subcommands
#[derive(Subcommand)]
pub enum PolicyCommands {
    /// List SLA policies
    List,
}

pub async fn handle_policy_command(
    command: PolicyCommands,
    client: &BackupClient,
    session: &Session,
) -> Result<()> {
    match command {
        PolicyCommands::List => {
            let policies = client.list_policies(session).await?;
            print_policies(&policies);
            Ok(())
        }
    }
}

pub(crate) fn print_policies(policies: &[StoragePolicy]) {
    if policies.is_empty() {
        println!("{}", "No SLA policies found.".yellow());
        return;
    }

    println!("{}", "Available SLA policies:".bold());
    for policy in policies {
        println!(
            "  ID: {}, Name: {}",
            policy.id.cyan(),
            policy.name.as_deref().unwrap_or("-")
        );
    }
}
