//! Job DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::Job;

/// Body returned by `GET /endeavour/job`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// Body of `POST /endeavour/job/{id}?action=start`
///
/// The appliance names the SLA policy to run under `actionname`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartJobRequest {
    #[serde(rename = "actionname")]
    pub action_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_request_wire_shape() {
        let body = serde_json::to_value(StartJobRequest {
            action_name: "15".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "actionname": "15" }));
    }

    #[test]
    fn test_job_list_defaults_to_empty() {
        let list: JobList = serde_json::from_str("{}").unwrap();
        assert!(list.jobs.is_empty());
    }
}
