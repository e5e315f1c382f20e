//! Client seam used by the job runner

use async_trait::async_trait;
use cdm_core::domain::job::JobStatus;

use crate::error::Result;
use crate::{BackupClient, Credentials, Session};

/// The calls the sequential job runner needs from the appliance
///
/// Implemented by [`BackupClient`]; tests substitute scripted fakes.
#[async_trait]
pub trait BackupApi: Send + Sync {
    /// Log in and obtain a session
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session>;

    /// Current status of a job
    async fn job_status(&self, session: &Session, job_id: &str) -> Result<JobStatus>;

    /// Start a job under an SLA policy
    async fn start_job(&self, session: &Session, job_id: &str, policy_id: &str) -> Result<()>;
}

#[async_trait]
impl BackupApi for BackupClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        self.login(credentials).await
    }

    async fn job_status(&self, session: &Session, job_id: &str) -> Result<JobStatus> {
        BackupClient::job_status(self, session, job_id).await
    }

    async fn start_job(&self, session: &Session, job_id: &str, policy_id: &str) -> Result<()> {
        BackupClient::start_job(self, session, job_id, policy_id).await
    }
}
