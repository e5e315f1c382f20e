//! SLA policy endpoints

use cdm_core::domain::policy::StoragePolicy;
use cdm_core::dto::policy::PolicyList;
use reqwest::Method;

use crate::error::Result;
use crate::{BackupClient, Session};

impl BackupClient {
    /// List the SLA policies jobs can be started under
    pub async fn list_policies(&self, session: &Session) -> Result<Vec<StoragePolicy>> {
        let url = self.url("/spec/storageprofile");
        let response = self.authed(Method::GET, &url, session).send().await?;

        let list: PolicyList = self.handle_response(response).await?;
        Ok(list.policies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_policies() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/spec/storageprofile")
            .match_header("X-Endeavour-Sessionid", "s-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"storageprofiles":[{"id":15,"name":"Gold"},{"id":"16","name":"Silver"}]}"#)
            .create_async()
            .await;

        let client = BackupClient::new(server.url());
        let policies = client.list_policies(&Session::new("s-1")).await.unwrap();

        let ids: Vec<&str> = policies.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["15", "16"]);
        assert_eq!(policies[0].name.as_deref(), Some("Gold"));
    }
}
