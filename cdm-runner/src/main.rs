//! CDM Job Runner
//!
//! Starts a primary backup job, waits until it reaches a terminal status and
//! starts a dependent job only if the primary succeeded.
//!
//! Architecture:
//! - Configuration: appliance connection, job pair and poll limits from the environment
//! - Clock: time source for the poll loop
//! - Scheduler: status polling and job sequencing
//!
//! The exit code tells the operator how the sequence ended: 0 success,
//! 1 configuration error, 2 authentication failed, 3 primary job failed,
//! 4 secondary job failed, 130 interrupted.

mod clock;
mod config;
mod scheduler;

use anyhow::{Context, Result};
use cdm_client::{BackupApi, BackupClient};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::clock::TokioClock;
use crate::config::Config;
use crate::scheduler::{JobPoller, SequenceRunner};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cdm_runner=info,cdm_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CDM job runner");

    let config = load_config()?;
    info!(
        "Loaded configuration: base_url={}, job_a={}, job_b={}, policy_id={}",
        config.base_url, config.job_a, config.job_b, config.policy_id
    );

    let client = if config.insecure_tls {
        warn!("Server certificate validation is disabled");
        BackupClient::insecure(&config.base_url).context("Failed to build HTTP client")?
    } else {
        BackupClient::new(&config.base_url)
    };
    let api: Arc<dyn BackupApi> = Arc::new(client);

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let poller = JobPoller::new(
        Arc::clone(&api),
        Arc::new(TokioClock),
        config.poll_policy(),
        cancel,
    );
    info!("Poll policy: {:?}", poller.policy());

    let runner = SequenceRunner::new(api, poller, config.credentials())
        .wait_secondary(config.wait_secondary);

    let report = runner
        .run(&config.job_a, &config.job_b, &config.policy_id)
        .await;

    if report.succeeded() {
        info!("{}", report);
    } else {
        error!("{}", report);
    }

    Ok(ExitCode::from(report.exit_code()))
}

/// Loads and validates configuration from environment variables
fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;
    Ok(config)
}

/// Cancels the run on the first Ctrl-C and exits on the second
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupt received, cancelling (press Ctrl-C again to exit immediately)");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            error!("Second interrupt received, exiting");
            std::process::exit(130);
        }
    });
}
