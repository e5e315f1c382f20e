//! Runner outcome types
//!
//! Produced by the sequential job runner while it starts jobs and waits for
//! them to reach a terminal status.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::job::JobStatus;

/// Request to start one job under one SLA policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRun {
    pub job_id: String,
    pub policy_id: String,
}

impl JobRun {
    pub fn new(job_id: impl Into<String>, policy_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            policy_id: policy_id.into(),
        }
    }
}

/// Why a wait on a job ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitEnd {
    /// The job reported a terminal success or failure status
    Terminal,
    /// The job reported a status the runner does not know
    Unrecognized,
    /// The status could not be fetched
    TransportFailed,
    /// The poll budget ran out while the job was still in progress
    PollsExhausted,
    /// The wait deadline elapsed while the job was still in progress
    DeadlineElapsed,
    /// The operator cancelled the wait
    Cancelled,
}

impl fmt::Display for WaitEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            WaitEnd::Terminal => "terminal status",
            WaitEnd::Unrecognized => "unrecognized status",
            WaitEnd::TransportFailed => "status request failed",
            WaitEnd::PollsExhausted => "poll budget exhausted",
            WaitEnd::DeadlineElapsed => "wait limit reached",
            WaitEnd::Cancelled => "wait cancelled",
        };
        f.write_str(reason)
    }
}

/// Result of waiting on one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerOutcome {
    pub job_id: String,
    pub succeeded: bool,
    /// Last observed status
    pub status: JobStatus,
    /// Number of status requests issued
    pub polls: u32,
    pub end: WaitEnd,
}

/// What happened to the dependent job once the primary succeeded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecondaryOutcome {
    /// The start request was accepted
    Started { job_id: String },
    /// The start request was rejected or could not be sent
    StartFailed { job_id: String, reason: String },
    /// The job was started and awaited
    Awaited(RunnerOutcome),
}

impl SecondaryOutcome {
    pub fn succeeded(&self) -> bool {
        match self {
            SecondaryOutcome::Started { .. } => true,
            SecondaryOutcome::StartFailed { .. } => false,
            SecondaryOutcome::Awaited(outcome) => outcome.succeeded,
        }
    }
}

/// Final report of one runner invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceReport {
    /// No session could be obtained; nothing was started
    AuthenticationFailed { reason: String },
    /// The primary job did not succeed; the secondary job was skipped
    PrimaryFailed {
        primary: RunnerOutcome,
        skipped_job_id: String,
    },
    /// The primary job succeeded but the secondary job did not
    SecondaryFailed {
        primary: RunnerOutcome,
        secondary: SecondaryOutcome,
    },
    Succeeded {
        primary: RunnerOutcome,
        secondary: SecondaryOutcome,
    },
    /// The operator interrupted the run
    Cancelled {
        /// Jobs whose start was already requested
        started: Vec<String>,
        /// Jobs left alone
        skipped: Vec<String>,
    },
}

impl SequenceReport {
    pub fn succeeded(&self) -> bool {
        matches!(self, SequenceReport::Succeeded { .. })
    }

    /// Process exit code for this report
    pub fn exit_code(&self) -> u8 {
        match self {
            SequenceReport::Succeeded { .. } => 0,
            SequenceReport::AuthenticationFailed { .. } => 2,
            SequenceReport::PrimaryFailed { .. } => 3,
            SequenceReport::SecondaryFailed { .. } => 4,
            SequenceReport::Cancelled { .. } => 130,
        }
    }
}

impl fmt::Display for SequenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceReport::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed, no job was started: {}", reason)
            }
            SequenceReport::PrimaryFailed {
                primary,
                skipped_job_id,
            } => write!(
                f,
                "Job {} did not complete successfully (status {}, {}). Job {} will not be started.",
                primary.job_id, primary.status, primary.end, skipped_job_id
            ),
            SequenceReport::SecondaryFailed { primary, secondary } => match secondary {
                SecondaryOutcome::StartFailed { job_id, reason } => write!(
                    f,
                    "Job {} completed successfully but job {} could not be started: {}",
                    primary.job_id, job_id, reason
                ),
                SecondaryOutcome::Awaited(outcome) => write!(
                    f,
                    "Job {} completed successfully but job {} did not (status {}, {})",
                    primary.job_id, outcome.job_id, outcome.status, outcome.end
                ),
                SecondaryOutcome::Started { job_id } => write!(
                    f,
                    "Job {} completed successfully, job {} was started",
                    primary.job_id, job_id
                ),
            },
            SequenceReport::Succeeded { primary, secondary } => match secondary {
                SecondaryOutcome::Awaited(outcome) => write!(
                    f,
                    "Jobs {} and {} completed successfully",
                    primary.job_id, outcome.job_id
                ),
                SecondaryOutcome::Started { job_id } | SecondaryOutcome::StartFailed { job_id, .. } => {
                    write!(
                        f,
                        "Job {} completed successfully, job {} started",
                        primary.job_id, job_id
                    )
                }
            },
            SequenceReport::Cancelled { started, skipped } => {
                write!(f, "Run cancelled")?;
                if !started.is_empty() {
                    write!(f, ". Start requested for job(s) {}", started.join(", "))?;
                }
                if !skipped.is_empty() {
                    write!(f, ". Not started: {}", skipped.join(", "))?;
                }
                Ok(())
            }
        }
    }
}
