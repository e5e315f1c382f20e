//! Sequential job runner
//!
//! Runs a primary job to completion and starts the secondary job only when
//! the primary succeeded. Both jobs share one SLA policy; jobs needing
//! different policies take two invocations.

use cdm_client::{BackupApi, ClientError, Credentials, Session};
use cdm_core::domain::run::{JobRun, SecondaryOutcome, SequenceReport, WaitEnd};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::scheduler::JobPoller;

pub struct SequenceRunner {
    api: Arc<dyn BackupApi>,
    poller: JobPoller,
    credentials: Credentials,
    cancel: CancellationToken,
    wait_secondary: bool,
}

impl SequenceRunner {
    /// Creates a runner sharing the poller's cancellation token
    pub fn new(api: Arc<dyn BackupApi>, poller: JobPoller, credentials: Credentials) -> Self {
        let cancel = poller.cancellation().clone();
        Self {
            api,
            poller,
            credentials,
            cancel,
            wait_secondary: false,
        }
    }

    /// Also wait for the secondary job to finish before reporting
    pub fn wait_secondary(mut self, wait: bool) -> Self {
        self.wait_secondary = wait;
        self
    }

    /// Runs `primary_job`, then `secondary_job` if the primary succeeded
    ///
    /// Once the token is cancelled no further job is started.
    pub async fn run(&self, primary_job: &str, secondary_job: &str, policy_id: &str) -> SequenceReport {
        let session = match self.unless_cancelled(self.api.authenticate(&self.credentials)).await {
            None => return cancelled(&[], &[primary_job, secondary_job]),
            Some(Ok(session)) => {
                info!("Session obtained for {}", self.credentials.username);
                session
            }
            Some(Err(e)) => {
                error!("Unable to obtain session: {}", e);
                return SequenceReport::AuthenticationFailed {
                    reason: e.to_string(),
                };
            }
        };

        let primary = JobRun::new(primary_job, policy_id);
        match self.start(&session, &primary).await {
            None => return cancelled(&[], &[primary_job, secondary_job]),
            // The job may already be running; its status decides the outcome.
            Some(Err(e)) => warn!(
                "Failed to start job {}: {}. Waiting on its status anyway.",
                primary.job_id, e
            ),
            Some(Ok(())) => {}
        }

        let primary_outcome = self.poller.await_terminal(&session, &primary.job_id).await;
        if primary_outcome.end == WaitEnd::Cancelled {
            return cancelled(&[primary_job], &[secondary_job]);
        }
        if !primary_outcome.succeeded {
            warn!(
                "Job {} did not complete successfully. Job {} will not be started.",
                primary.job_id, secondary_job
            );
            return SequenceReport::PrimaryFailed {
                primary: primary_outcome,
                skipped_job_id: secondary_job.to_string(),
            };
        }

        let secondary = JobRun::new(secondary_job, policy_id);
        let started = self.start(&session, &secondary).await;
        let secondary_outcome = match started {
            None => return cancelled(&[primary_job], &[secondary_job]),
            Some(Err(e)) => {
                error!("Failed to start job {}: {}", secondary.job_id, e);
                SecondaryOutcome::StartFailed {
                    job_id: secondary.job_id,
                    reason: e.to_string(),
                }
            }
            Some(Ok(())) if self.wait_secondary => {
                let outcome = self.poller.await_terminal(&session, &secondary.job_id).await;
                if outcome.end == WaitEnd::Cancelled {
                    return cancelled(&[primary_job, secondary_job], &[]);
                }
                SecondaryOutcome::Awaited(outcome)
            }
            Some(Ok(())) => SecondaryOutcome::Started {
                job_id: secondary.job_id,
            },
        };

        if secondary_outcome.succeeded() {
            SequenceReport::Succeeded {
                primary: primary_outcome,
                secondary: secondary_outcome,
            }
        } else {
            SequenceReport::SecondaryFailed {
                primary: primary_outcome,
                secondary: secondary_outcome,
            }
        }
    }

    /// Requests the start of `run`; `None` if cancelled first
    async fn start(&self, session: &Session, run: &JobRun) -> Option<Result<(), ClientError>> {
        if self.cancel.is_cancelled() {
            return None;
        }
        info!("Starting job {} under policy {}", run.job_id, run.policy_id);
        self.unless_cancelled(self.api.start_job(session, &run.job_id, &run.policy_id))
            .await
    }

    /// Drives `request` unless the token fires first
    async fn unless_cancelled<T>(&self, request: impl Future<Output = T>) -> Option<T> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            reply = request => Some(reply),
        }
    }
}

fn cancelled(started: &[&str], skipped: &[&str]) -> SequenceReport {
    warn!("Run cancelled before completion");
    SequenceReport::Cancelled {
        started: started.iter().map(|id| id.to_string()).collect(),
        skipped: skipped.iter().map(|id| id.to_string()).collect(),
    }
}
