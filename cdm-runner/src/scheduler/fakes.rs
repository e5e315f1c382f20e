//! Scripted appliance used by the scheduler tests

use async_trait::async_trait;
use cdm_client::{BackupApi, ClientError, Credentials, Result, Session};
use cdm_core::domain::job::JobStatus;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Authenticate,
    Status(String),
    Start { job_id: String, policy_id: String },
}

/// Status reply scripted for one poll
pub enum Reply {
    Status(&'static str),
    Unreachable,
    /// The request never completes
    Stall,
}

#[derive(Default)]
pub struct ScriptedApi {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    rejected_starts: HashSet<String>,
    reject_login: bool,
    stall_login: bool,
    cancel_on_stall: Option<CancellationToken>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, job_id: &str, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_default()
            .extend(replies);
        self
    }

    pub fn statuses(self, job_id: &str, statuses: &[&'static str]) -> Self {
        self.script(job_id, statuses.iter().copied().map(Reply::Status))
    }

    pub fn reject_start(mut self, job_id: &str) -> Self {
        self.rejected_starts.insert(job_id.to_string());
        self
    }

    pub fn reject_login(mut self) -> Self {
        self.reject_login = true;
        self
    }

    pub fn stall_login(mut self) -> Self {
        self.stall_login = true;
        self
    }

    /// Cancel `token` as soon as a request stalls
    pub fn cancel_on_stall(mut self, token: CancellationToken) -> Self {
        self.cancel_on_stall = Some(token);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn starts(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Start { job_id, policy_id } => Some((job_id, policy_id)),
                _ => None,
            })
            .collect()
    }

    pub fn polls_of(&self, job_id: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Status(id) if id == job_id))
            .count()
    }
}

impl ScriptedApi {
    async fn stall<T>(&self) -> T {
        if let Some(token) = &self.cancel_on_stall {
            token.cancel();
        }
        std::future::pending().await
    }
}

#[async_trait]
impl BackupApi for ScriptedApi {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<Session> {
        self.calls.lock().unwrap().push(Call::Authenticate);
        if self.stall_login {
            return self.stall().await;
        }
        if self.reject_login {
            return Err(ClientError::AuthenticationFailed("status 401: denied".to_string()));
        }
        Ok(Session::new("s-test"))
    }

    async fn job_status(&self, _session: &Session, job_id: &str) -> Result<JobStatus> {
        self.calls.lock().unwrap().push(Call::Status(job_id.to_string()));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(job_id)
            .and_then(|queue| queue.pop_front());
        match reply {
            Some(Reply::Status(raw)) => Ok(JobStatus::parse(raw)),
            Some(Reply::Unreachable) => Err(ClientError::api_error(503, "unavailable")),
            Some(Reply::Stall) => self.stall().await,
            None => panic!("no scripted status left for job {}", job_id),
        }
    }

    async fn start_job(&self, _session: &Session, job_id: &str, policy_id: &str) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Start {
            job_id: job_id.to_string(),
            policy_id: policy_id.to_string(),
        });
        if self.rejected_starts.contains(job_id) {
            return Err(ClientError::AlreadyRunning(job_id.to_string()));
        }
        Ok(())
    }
}
