//! Job domain types

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Job definition as reported by the appliance
///
/// Only the fields the tooling prints or acts on are modelled; everything
/// else in the payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub policy_name: Option<String>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub last_session_status: Option<String>,
    #[serde(default, rename = "type")]
    pub job_type: Option<String>,
    #[serde(default)]
    pub sub_type: Option<String>,
    #[serde(default)]
    pub last_session_duration: Option<serde_json::Value>,
    #[serde(default, rename = "lastrun")]
    pub last_run: Option<LastRun>,
    #[serde(default)]
    pub links: HashMap<String, Link>,
}

impl Job {
    /// Absolute URL of the log of the job's most recent session, if any
    pub fn last_run_log_href(&self) -> Option<&str> {
        self.links
            .get("lastrunlog")
            .and_then(|link| link.href.as_deref())
    }
}

/// Summary of a job's most recent session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LastRun {
    #[serde(default)]
    pub start: Option<serde_json::Value>,
    #[serde(default)]
    pub results: Option<serde_json::Value>,
}

/// HAL-style link attached to a job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub href: Option<String>,
}

/// Job status as reported by the appliance
///
/// The wire format is an upper-case string. Strings the tooling does not know
/// are kept verbatim in [`JobStatus::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Completed,
    Idle,
    Failed,
    Cancelled,
    Running,
    Active,
    /// Status could not be determined (missing field or failed request)
    #[default]
    Unknown,
    Unrecognized(String),
}

/// How the runner treats a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// The job finished and the dependent job may run
    Success,
    /// The job finished without success
    Failure,
    /// The job is still going; poll again
    InProgress,
    /// Anything else; treated as a failed wait without retry
    Unrecognized,
}

impl JobStatus {
    /// Parse a wire status string
    pub fn parse(raw: &str) -> Self {
        match raw {
            "COMPLETED" => JobStatus::Completed,
            "IDLE" => JobStatus::Idle,
            "FAILED" => JobStatus::Failed,
            "CANCELLED" => JobStatus::Cancelled,
            "RUNNING" => JobStatus::Running,
            "ACTIVE" => JobStatus::Active,
            "UNKNOWN" => JobStatus::Unknown,
            other => JobStatus::Unrecognized(other.to_string()),
        }
    }

    /// Wire representation of the status
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Completed => "COMPLETED",
            JobStatus::Idle => "IDLE",
            JobStatus::Failed => "FAILED",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::Running => "RUNNING",
            JobStatus::Active => "ACTIVE",
            JobStatus::Unknown => "UNKNOWN",
            JobStatus::Unrecognized(raw) => raw,
        }
    }

    /// Classify the status for the polling state machine
    pub fn class(&self) -> StatusClass {
        match self {
            JobStatus::Completed | JobStatus::Idle => StatusClass::Success,
            JobStatus::Failed | JobStatus::Cancelled => StatusClass::Failure,
            JobStatus::Running | JobStatus::Active => StatusClass::InProgress,
            JobStatus::Unknown | JobStatus::Unrecognized(_) => StatusClass::Unrecognized,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.class() != StatusClass::InProgress
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        JobStatus::parse(&raw)
    }
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        JobStatus::parse(raw)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts identifiers sent either as JSON strings or JSON numbers
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(JobStatus::parse("COMPLETED").class(), StatusClass::Success);
        assert_eq!(JobStatus::parse("IDLE").class(), StatusClass::Success);
        assert_eq!(JobStatus::parse("FAILED").class(), StatusClass::Failure);
        assert_eq!(JobStatus::parse("CANCELLED").class(), StatusClass::Failure);
        assert_eq!(JobStatus::parse("RUNNING").class(), StatusClass::InProgress);
        assert_eq!(JobStatus::parse("ACTIVE").class(), StatusClass::InProgress);
        assert_eq!(JobStatus::parse("UNKNOWN").class(), StatusClass::Unrecognized);
        assert_eq!(JobStatus::parse("PAUSED").class(), StatusClass::Unrecognized);
    }

    #[test]
    fn test_status_matching_is_case_sensitive() {
        assert_eq!(
            JobStatus::parse("completed"),
            JobStatus::Unrecognized("completed".to_string())
        );
    }

    #[test]
    fn test_unrecognized_status_keeps_raw_text() {
        let status = JobStatus::parse("PAUSED");
        assert_eq!(status.to_string(), "PAUSED");
        assert!(status.is_terminal());
    }

    #[test]
    fn test_job_deserializes_appliance_payload() {
        let job: Job = serde_json::from_value(serde_json::json!({
            "id": 1031,
            "name": "Epic nightly",
            "policyName": "Gold",
            "status": "RUNNING",
            "lastSessionStatus": "COMPLETED",
            "type": "catalog",
            "subType": "vmware",
            "lastSessionDuration": 42,
            "lastrun": { "start": 1700000000000_i64, "results": "ok" },
            "links": { "lastrunlog": { "href": "https://cdm/api/endeavour/log/job/9" } }
        }))
        .unwrap();

        assert_eq!(job.id, "1031");
        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.job_type.as_deref(), Some("catalog"));
        assert_eq!(
            job.last_run_log_href(),
            Some("https://cdm/api/endeavour/log/job/9")
        );
    }

    #[test]
    fn test_job_missing_status_is_unknown() {
        let job: Job = serde_json::from_value(serde_json::json!({ "id": "7" })).unwrap();
        assert_eq!(job.status, JobStatus::Unknown);
        assert!(job.last_run_log_href().is_none());
    }
}
