//! Job log endpoints

use cdm_core::domain::log::LogEntry;
use cdm_core::dto::log::LogPage;
use reqwest::Method;
use tracing::debug;

use crate::error::Result;
use crate::{BackupClient, Session};

impl BackupClient {
    /// Fetch a job log document by log ID
    ///
    /// The document is returned as raw JSON; its shape varies between
    /// appliance releases.
    pub async fn get_log(&self, session: &Session, log_id: &str) -> Result<serde_json::Value> {
        let url = self.url(&format!("/endeavour/log/job/{}", log_id));
        let response = self.authed(Method::GET, &url, session).send().await?;

        self.handle_response(response).await
    }

    /// Fetch the log of a job's most recent session
    ///
    /// Follows the job's `lastrunlog` link. Returns `None` when the job has no
    /// such link (it never ran).
    pub async fn latest_job_log(
        &self,
        session: &Session,
        job_id: &str,
    ) -> Result<Option<Vec<LogEntry>>> {
        let job = self.get_job(session, job_id).await?;

        let Some(href) = job.last_run_log_href() else {
            debug!("Job {} has no lastrunlog link", job_id);
            return Ok(None);
        };

        debug!("Following lastrunlog link {}", href);
        let response = self.authed(Method::GET, href, session).send().await?;
        let page: LogPage = self.handle_response(response).await?;

        Ok(Some(page.logs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_latest_job_log_follows_link() {
        let mut server = mockito::Server::new_async().await;
        let job_body = serde_json::json!({
            "id": "1031",
            "status": "IDLE",
            "links": { "lastrunlog": { "href": format!("{}/endeavour/log/job/77", server.url()) } }
        });
        let _job = server
            .mock("GET", "/endeavour/job/1031")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(job_body.to_string())
            .create_async()
            .await;
        let _logs = server
            .mock("GET", "/endeavour/log/job/77")
            .match_header("X-Endeavour-Sessionid", "s-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"logs":[{"logTime":1700000000000,"type":"INFO","message":"Job started"}]}"#)
            .create_async()
            .await;

        let client = BackupClient::new(server.url());
        let logs = client
            .latest_job_log(&Session::new("s-1"), "1031")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message.as_deref(), Some("Job started"));
    }

    #[tokio::test]
    async fn test_latest_job_log_without_link() {
        let mut server = mockito::Server::new_async().await;
        let _job = server
            .mock("GET", "/endeavour/job/1031")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"1031","links":{}}"#)
            .create_async()
            .await;

        let client = BackupClient::new(server.url());
        let logs = client
            .latest_job_log(&Session::new("s-1"), "1031")
            .await
            .unwrap();

        assert!(logs.is_none());
    }

    #[tokio::test]
    async fn test_get_log_returns_raw_document() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/endeavour/log/job/9")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"logs":[],"total":0}"#)
            .create_async()
            .await;

        let client = BackupClient::new(server.url());
        let doc = client.get_log(&Session::new("s-1"), "9").await.unwrap();

        assert_eq!(doc["total"], 0);
    }
}
