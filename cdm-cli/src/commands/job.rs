//! Job command handlers
//!
//! Handles all job-related CLI commands including listing, viewing details,
//! starting jobs and reading the latest session log.

use anyhow::{Context, Result};
use cdm_client::{BackupClient, ClientError, Session};
use cdm_core::domain::job::{Job, JobStatus, StatusClass};
use cdm_core::domain::log::LogEntry;
use clap::Subcommand;
use colored::*;

use super::{display_time, display_value};

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// List all jobs with their SLA policy
    List,
    /// Print a compact status table of all jobs
    Status,
    /// Get job details
    Get {
        /// Job ID
        id: String,
    },
    /// Start a job under an SLA policy
    Start {
        /// Job ID
        id: String,

        /// SLA policy ID
        #[arg(long)]
        policy: String,

        /// Skip checking the job and policy IDs against the appliance lists
        #[arg(long)]
        no_verify: bool,
    },
    /// Show the log of the job's latest session
    Logs {
        /// Job ID
        id: String,
    },
}

/// Handle job commands
pub async fn handle_job_command(
    command: JobCommands,
    client: &BackupClient,
    session: &Session,
) -> Result<()> {
    match command {
        JobCommands::List => list_jobs(client, session).await,
        JobCommands::Status => print_status_table(client, session).await,
        JobCommands::Get { id } => get_job(client, session, &id).await,
        JobCommands::Start {
            id,
            policy,
            no_verify,
        } => {
            if !no_verify {
                verify_start(client, session, &id, &policy).await?;
            }
            start_job(client, session, &id, &policy).await
        }
        JobCommands::Logs { id } => latest_logs(client, session, &id).await,
    }
}

/// List all jobs with name and SLA policy
async fn list_jobs(client: &BackupClient, session: &Session) -> Result<()> {
    let jobs = client.list_jobs(session).await?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} job(s):", jobs.len()).bold());
    println!();
    for job in &jobs {
        print_job_summary(job);
    }

    Ok(())
}

/// Print `Job Number | Status | Name` for every job
async fn print_status_table(client: &BackupClient, session: &Session) -> Result<()> {
    let jobs = client.list_jobs(session).await?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
        return Ok(());
    }

    println!("{}", "Job Number | Status     | Name".bold());
    println!("{}", "-".repeat(40).dimmed());
    for job in &jobs {
        println!(
            "{:<11} {} {}",
            job.id,
            colorize_status(&job.status, 10),
            job.name.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

/// Get and display a single job
pub(crate) async fn get_job(client: &BackupClient, session: &Session, id: &str) -> Result<()> {
    let job = client
        .get_job(session, id)
        .await
        .with_context(|| format!("Failed to fetch job {}", id))?;

    print_job_details(&job);
    Ok(())
}

/// Check that both identifiers exist before starting
async fn verify_start(
    client: &BackupClient,
    session: &Session,
    job_id: &str,
    policy_id: &str,
) -> Result<()> {
    let jobs = client.list_jobs(session).await?;
    ensure_listed(job_id, jobs.iter().map(|job| job.id.as_str()), "Job ID")?;

    let policies = client.list_policies(session).await?;
    ensure_listed(
        policy_id,
        policies.iter().map(|policy| policy.id.as_str()),
        "SLA policy ID",
    )
}

fn ensure_listed<'a>(id: &str, mut known: impl Iterator<Item = &'a str>, what: &str) -> Result<()> {
    if known.any(|candidate| candidate == id) {
        Ok(())
    } else {
        anyhow::bail!("Invalid {} selected: {}", what, id)
    }
}

/// Start a job and report the appliance's answer
pub(crate) async fn start_job(
    client: &BackupClient,
    session: &Session,
    job_id: &str,
    policy_id: &str,
) -> Result<()> {
    match client.start_job(session, job_id, policy_id).await {
        Ok(()) => {
            println!(
                "{} Job {} started successfully.",
                "✓".green(),
                job_id.cyan()
            );
            Ok(())
        }
        Err(e) => {
            let message = match &e {
                ClientError::InvalidRequest(detail) => {
                    format!("Failed to start job {}: {}", job_id, detail)
                }
                ClientError::PermissionDenied(_) => {
                    format!("Permission denied to start job {}.", job_id)
                }
                ClientError::NotFound(_) => format!("Job {} not found.", job_id),
                ClientError::AlreadyRunning(_) => {
                    format!("Job {} is already running or in progress.", job_id)
                }
                other => format!("Failed to start job {}: {}", job_id, other),
            };
            println!("{} {}", "✗".red(), message.red());
            Err(e.into())
        }
    }
}

/// Show the log of the job's latest session
pub(crate) async fn latest_logs(client: &BackupClient, session: &Session, id: &str) -> Result<()> {
    let Some(logs) = client.latest_job_log(session, id).await? else {
        println!("{}", "No lastrunlog link found in job details.".yellow());
        return Ok(());
    };

    if logs.is_empty() {
        println!("{}", "No logs found for the latest session.".yellow());
        return Ok(());
    }

    println!("{}", format!("Logs for the latest session of job {}:", id).bold());
    println!("{}", "─".repeat(80).dimmed());
    for (idx, entry) in logs.iter().enumerate() {
        print_log_entry(idx + 1, entry);
    }
    println!("{}", "─".repeat(80).dimmed());

    Ok(())
}

/// Print a job summary for listings
fn print_job_summary(job: &Job) {
    println!(
        "  {} [{}] Job ID: {}",
        "▸".cyan(),
        colorize_status(&job.status, 0),
        job.id.bold()
    );
    println!("    Name:                  {}", job.name.as_deref().unwrap_or("-"));
    println!(
        "    Associated SLA Policy: {}",
        job.policy_name
            .as_deref()
            .unwrap_or("No policy assigned")
            .dimmed()
    );
    println!();
}

/// Print detailed job information
fn print_job_details(job: &Job) {
    let last_run = job.last_run.as_ref();

    println!("{}", format!("Job Details for ID: {}", job.id).bold());
    println!("  Name:                  {}", job.name.as_deref().unwrap_or("-"));
    println!(
        "  Description:           {}",
        job.description.as_deref().unwrap_or("-")
    );
    println!(
        "  Policy Name:           {}",
        job.policy_name.as_deref().unwrap_or("-")
    );
    println!("  Status:                {}", colorize_status(&job.status, 0));
    println!(
        "  Last Session Status:   {}",
        job.last_session_status.as_deref().unwrap_or("-")
    );
    println!("  Type:                  {}", job.job_type.as_deref().unwrap_or("-"));
    println!("  Sub-Type:              {}", job.sub_type.as_deref().unwrap_or("-"));
    println!(
        "  Last Run Time:         {}",
        display_time(last_run.and_then(|run| run.start.as_ref()))
    );
    println!(
        "  Last Session Duration: {} seconds",
        display_value(job.last_session_duration.as_ref())
    );
    println!(
        "  Results:               {}",
        display_value(last_run.and_then(|run| run.results.as_ref()))
    );
}

/// Print a numbered log entry
fn print_log_entry(index: usize, entry: &LogEntry) {
    let time = entry
        .timestamp()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let kind = entry.entry_type.as_deref().unwrap_or("-");
    let kind = match kind {
        "ERROR" => kind.red(),
        "WARN" | "WARNING" => kind.yellow(),
        _ => kind.normal(),
    };

    println!(
        "{}. Time: {} | Type: {} | Message: {}",
        index,
        time.dimmed(),
        kind,
        entry.message.as_deref().unwrap_or("")
    );
}

/// Colorize job status for display, padded to `width`
fn colorize_status(status: &JobStatus, width: usize) -> ColoredString {
    let text = format!("{:<width$}", status.as_str(), width = width);
    match status.class() {
        StatusClass::Success => text.green(),
        StatusClass::Failure => text.red(),
        StatusClass::InProgress => text.cyan(),
        StatusClass::Unrecognized => text.yellow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_listed() {
        let known = ["1031", "1044"];
        assert!(ensure_listed("1044", known.iter().copied(), "Job ID").is_ok());

        let err = ensure_listed("9999", known.iter().copied(), "Job ID").unwrap_err();
        assert_eq!(err.to_string(), "Invalid Job ID selected: 9999");
    }

    #[test]
    fn test_colorize_status_pads_text() {
        colored::control::set_override(false);
        assert_eq!(
            colorize_status(&JobStatus::Idle, 10).to_string(),
            "IDLE      "
        );
        assert_eq!(
            colorize_status(&JobStatus::parse("PAUSED"), 0).to_string(),
            "PAUSED"
        );
    }
}
