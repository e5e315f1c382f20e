//! Interactive menu
//!
//! Keyboard-driven flows over the same handlers as the one-shot commands.
//! Job and policy IDs are picked from the lists fetched from the appliance.

use anyhow::{Context, Result};
use cdm_client::{BackupClient, Session};
use cdm_core::domain::job::Job;
use cdm_core::domain::policy::StoragePolicy;
use colored::*;
use dialoguer::{Input, Select};

use super::job::{get_job, latest_logs, start_job};
use super::log::print_log_document;

const ITEMS: [&str; 5] = [
    "Get job by ID",
    "Start a job",
    "Show latest job logs",
    "Get job log by log ID",
    "Exit",
];

/// Run the menu until the operator picks "Exit"
pub async fn run_menu(client: &BackupClient, session: &Session) -> Result<()> {
    println!("{}", "Fetching available jobs...".dimmed());
    let jobs = client.list_jobs(session).await?;

    if jobs.is_empty() {
        println!("{}", "No jobs available. Exiting.".yellow());
        return Ok(());
    }

    loop {
        let selection = Select::new()
            .with_prompt("Select an operation")
            .items(&ITEMS)
            .default(0)
            .interact()?;

        // Failures of one flow are shown and the menu continues.
        let outcome = match selection {
            0 => {
                let job = pick_job(&jobs)?;
                get_job(client, session, &job.id).await
            }
            1 => {
                let job = pick_job(&jobs)?;
                start_with_policy(client, session, job, pick_policy).await
            }
            2 => {
                let job = pick_job(&jobs)?;
                latest_logs(client, session, &job.id).await
            }
            3 => {
                let log_id: String = Input::new().with_prompt("Log ID").interact_text()?;
                print_log_document(client, session, log_id.trim()).await
            }
            _ => break,
        };

        if let Err(e) = outcome {
            println!("{} {:#}", "Error:".red(), e);
        }
        println!();
    }

    Ok(())
}

/// Start `job` under a policy chosen from the appliance's list
async fn start_with_policy(
    client: &BackupClient,
    session: &Session,
    job: &Job,
    choose: impl FnOnce(&[StoragePolicy]) -> Result<Option<&StoragePolicy>>,
) -> Result<()> {
    let policies = client
        .list_policies(session)
        .await
        .context("Failed to fetch SLA policies")?;

    match choose(&policies)? {
        Some(policy) => start_job(client, session, &job.id, &policy.id).await,
        None => {
            println!("{}", "No SLA policies found.".yellow());
            Ok(())
        }
    }
}

fn pick_job(jobs: &[Job]) -> Result<&Job> {
    let labels: Vec<String> = jobs
        .iter()
        .map(|job| {
            format!(
                "{:<8} {:<10} {}",
                job.id,
                job.status.as_str(),
                job.name.as_deref().unwrap_or("-")
            )
        })
        .collect();

    let index = Select::new()
        .with_prompt("Job")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(&jobs[index])
}

fn pick_policy(policies: &[StoragePolicy]) -> Result<Option<&StoragePolicy>> {
    if policies.is_empty() {
        return Ok(None);
    }

    let labels: Vec<String> = policies
        .iter()
        .map(|policy| format!("{:<6} {}", policy.id, policy.name.as_deref().unwrap_or("-")))
        .collect();

    let index = Select::new()
        .with_prompt("SLA policy")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(Some(&policies[index]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str) -> Job {
        serde_json::from_value(serde_json::json!({ "id": id, "status": "IDLE" })).unwrap()
    }

    #[tokio::test]
    async fn test_policy_list_failure_stays_in_the_flow() {
        let mut server = mockito::Server::new_async().await;
        let _policies = server
            .mock("GET", "/spec/storageprofile")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;
        let client = BackupClient::new(server.url());

        let result = start_with_policy(&client, &Session::new("s-test"), &job("1031"), |_| {
            panic!("no policy list to choose from")
        })
        .await;

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).starts_with("Failed to fetch SLA policies"));
    }

    #[tokio::test]
    async fn test_empty_policy_list_starts_nothing() {
        let mut server = mockito::Server::new_async().await;
        let _policies = server
            .mock("GET", "/spec/storageprofile")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"storageprofiles": []}"#)
            .create_async()
            .await;
        let start = server
            .mock("POST", "/endeavour/job/1031")
            .expect(0)
            .create_async()
            .await;
        let client = BackupClient::new(server.url());

        start_with_policy(&client, &Session::new("s-test"), &job("1031"), pick_policy)
            .await
            .unwrap();

        start.assert_async().await;
    }
}
