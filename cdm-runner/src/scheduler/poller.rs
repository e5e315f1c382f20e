//! Job status poller
//!
//! Polls the appliance for one job's status on a fixed interval until the job
//! reaches a terminal status. Transitions:
//! - COMPLETED, IDLE: succeeded
//! - FAILED, CANCELLED: failed, no further polling
//! - RUNNING, ACTIVE: sleep one interval and poll again
//! - anything else: failed immediately, no retry
//!
//! The loop is additionally bounded by an optional poll budget and deadline
//! and stops when the cancellation token fires.

use cdm_client::{BackupApi, Session};
use cdm_core::domain::job::{JobStatus, StatusClass};
use cdm_core::domain::run::{RunnerOutcome, WaitEnd};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::clock::Clock;

/// Limits applied while waiting on one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Status requests allowed per job (`None` = unbounded)
    pub max_polls: Option<u32>,
    /// Time allowed per job (`None` = unbounded)
    pub max_wait: Option<Duration>,
    /// Consecutive failed status requests tolerated
    pub transport_retries: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            max_polls: None,
            max_wait: None,
            transport_retries: 0,
        }
    }
}

/// Waits on jobs until they reach a terminal status
pub struct JobPoller {
    api: Arc<dyn BackupApi>,
    clock: Arc<dyn Clock>,
    policy: PollPolicy,
    cancel: CancellationToken,
}

impl JobPoller {
    pub fn new(
        api: Arc<dyn BackupApi>,
        clock: Arc<dyn Clock>,
        policy: PollPolicy,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            clock,
            policy,
            cancel,
        }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Token that stops every wait driven by this poller
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Polls `job_id` until it reaches a terminal status
    ///
    /// Never starts the job; calling it again after a terminal status only
    /// issues new status requests.
    pub async fn await_terminal(&self, session: &Session, job_id: &str) -> RunnerOutcome {
        let started = self.clock.now();
        let mut polls = 0;
        let mut failed_requests = 0;
        let mut last = JobStatus::Unknown;

        info!(
            "Waiting for job {} (interval: {:?})",
            job_id, self.policy.interval
        );

        loop {
            if self.cancel.is_cancelled() {
                warn!("Wait for job {} cancelled", job_id);
                return outcome(job_id, false, last, polls, WaitEnd::Cancelled);
            }

            polls += 1;
            let reply = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    return self.stopped(job_id, last, polls, WaitEnd::Cancelled);
                }
                reply = self.api.job_status(session, job_id) => reply,
            };
            let status = match reply {
                Ok(status) => {
                    failed_requests = 0;
                    status
                }
                Err(e) => {
                    failed_requests += 1;
                    if failed_requests > self.policy.transport_retries {
                        error!("Failed to fetch status of job {}: {}", job_id, e);
                        return outcome(
                            job_id,
                            false,
                            JobStatus::Unknown,
                            polls,
                            WaitEnd::TransportFailed,
                        );
                    }

                    warn!(
                        "Failed to fetch status of job {} (attempt {}/{}): {}",
                        job_id, failed_requests, self.policy.transport_retries, e
                    );
                    if let Some(end) = self.pause(started, polls).await {
                        return self.stopped(job_id, last, polls, end);
                    }
                    continue;
                }
            };

            info!("Job {} current status: {}", job_id, status);
            last = status.clone();

            match status.class() {
                StatusClass::Success => {
                    info!("Job {} completed successfully.", job_id);
                    return outcome(job_id, true, status, polls, WaitEnd::Terminal);
                }
                StatusClass::Failure => {
                    warn!(
                        "Job {} did not complete successfully. Status: {}",
                        job_id, status
                    );
                    return outcome(job_id, false, status, polls, WaitEnd::Terminal);
                }
                StatusClass::Unrecognized => {
                    error!("Unexpected status for job {}: {}", job_id, status);
                    return outcome(job_id, false, status, polls, WaitEnd::Unrecognized);
                }
                StatusClass::InProgress => {
                    info!(
                        "Job {} is still in progress. Checking again in {} seconds...",
                        job_id,
                        self.policy.interval.as_secs()
                    );
                    if let Some(end) = self.pause(started, polls).await {
                        return self.stopped(job_id, last, polls, end);
                    }
                }
            }
        }
    }

    /// Sleeps one interval, or reports why the wait has to stop instead
    async fn pause(&self, started: Instant, polls: u32) -> Option<WaitEnd> {
        if self.policy.max_polls.is_some_and(|max| polls >= max) {
            return Some(WaitEnd::PollsExhausted);
        }

        if let Some(max_wait) = self.policy.max_wait {
            let elapsed = self.clock.now().saturating_duration_since(started);
            if elapsed + self.policy.interval > max_wait {
                return Some(WaitEnd::DeadlineElapsed);
            }
        }

        debug!("Sleeping {:?} before next poll", self.policy.interval);
        tokio::select! {
            _ = self.cancel.cancelled() => Some(WaitEnd::Cancelled),
            _ = self.clock.sleep(self.policy.interval) => None,
        }
    }

    fn stopped(&self, job_id: &str, last: JobStatus, polls: u32, end: WaitEnd) -> RunnerOutcome {
        match end {
            WaitEnd::PollsExhausted => warn!(
                "Giving up on job {} after {} status requests (last status: {})",
                job_id, polls, last
            ),
            WaitEnd::DeadlineElapsed => warn!(
                "Giving up on job {}: wait limit of {:?} reached (last status: {})",
                job_id, self.policy.max_wait, last
            ),
            WaitEnd::Cancelled => warn!("Wait for job {} cancelled", job_id),
            _ => {}
        }
        outcome(job_id, false, last, polls, end)
    }
}

fn outcome(job_id: &str, succeeded: bool, status: JobStatus, polls: u32, end: WaitEnd) -> RunnerOutcome {
    RunnerOutcome {
        job_id: job_id.to_string(),
        succeeded,
        status,
        polls,
        end,
    }
}
