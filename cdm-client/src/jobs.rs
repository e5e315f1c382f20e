//! Job-related API endpoints

use cdm_core::domain::job::{Job, JobStatus};
use cdm_core::dto::job::{JobList, StartJobRequest};
use reqwest::Method;
use tracing::{debug, info};

use crate::error::{ClientError, Result};
use crate::{BackupClient, Session};

impl BackupClient {
    // =============================================================================
    // Job Queries
    // =============================================================================

    /// List all jobs known to the appliance
    pub async fn list_jobs(&self, session: &Session) -> Result<Vec<Job>> {
        let url = self.url("/endeavour/job");
        let response = self.authed(Method::GET, &url, session).send().await?;

        let list: JobList = self.handle_response(response).await?;
        Ok(list.jobs)
    }

    /// Get a job by ID
    ///
    /// # Arguments
    /// * `job_id` - The appliance job identifier (e.g. "1031")
    pub async fn get_job(&self, session: &Session, job_id: &str) -> Result<Job> {
        let url = self.url(&format!("/endeavour/job/{}", job_id));
        let response = self.authed(Method::GET, &url, session).send().await?;

        self.handle_response(response).await
    }

    /// Fetch the current status of a job
    ///
    /// A payload without a `status` field yields [`JobStatus::Unknown`].
    pub async fn job_status(&self, session: &Session, job_id: &str) -> Result<JobStatus> {
        let job = self.get_job(session, job_id).await?;
        debug!("Job {} reported status {}", job_id, job.status);
        Ok(job.status)
    }

    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Start a job under the given SLA policy
    ///
    /// # Arguments
    /// * `job_id` - The job to start
    /// * `policy_id` - The SLA policy, sent as the start action name
    ///
    /// # Errors
    /// Rejections are mapped to specific variants: 400 to
    /// [`ClientError::InvalidRequest`], 403 to [`ClientError::PermissionDenied`],
    /// 404 to [`ClientError::NotFound`] and 409 to [`ClientError::AlreadyRunning`].
    pub async fn start_job(&self, session: &Session, job_id: &str, policy_id: &str) -> Result<()> {
        let url = self.url(&format!("/endeavour/job/{}", job_id));
        let response = self
            .authed(Method::POST, &url, session)
            .query(&[("action", "start")])
            .json(&StartJobRequest {
                action_name: policy_id.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("Job {} started under policy {}", job_id, policy_id);
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            400 => ClientError::InvalidRequest(format!("Bad request. {}", text)),
            403 => ClientError::PermissionDenied(format!("cannot start job {}", job_id)),
            404 => ClientError::NotFound(format!("job {}", job_id)),
            409 => ClientError::AlreadyRunning(job_id.to_string()),
            code => ClientError::api_error(code, text),
        })
    }
}
