//! Session login

use cdm_core::dto::session::SessionResponse;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::fmt;
use tracing::debug;

use crate::BackupClient;
use crate::error::{ClientError, Result};

/// Username and password used for HTTP basic auth at login
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session token returned by the appliance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl BackupClient {
    /// Log in and obtain a session
    ///
    /// # Errors
    /// [`ClientError::AuthenticationFailed`] when the appliance rejects the
    /// credentials or answers without a session id.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let url = self.url("/endeavour/session");
        debug!("Logging in as {}", credentials.username);

        let response = self
            .client
            .post(&url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::AuthenticationFailed(format!(
                "status {}: {}",
                status.as_u16(),
                text
            )));
        }

        let body: SessionResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse session response: {}", e)))?;

        match body.session_id {
            Some(id) if !id.is_empty() => Ok(Session::new(id)),
            _ => Err(ClientError::AuthenticationFailed(
                "No session ID returned".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_login_returns_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/endeavour/session")
            .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sessionid":"s-123","user":{"name":"admin"}}"#)
            .create_async()
            .await;

        let client = BackupClient::new(server.url());
        let session = client
            .login(&Credentials::new("admin", "secret"))
            .await
            .unwrap();

        assert_eq!(session.id(), "s-123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/endeavour/session")
            .match_header("authorization", Matcher::Any)
            .with_status(401)
            .with_body("bad credentials")
            .create_async()
            .await;

        let client = BackupClient::new(server.url());
        let err = client
            .login(&Credentials::new("admin", "wrong"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::AuthenticationFailed(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_login_without_session_id() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/endeavour/session")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let client = BackupClient::new(server.url());
        let err = client
            .login(&Credentials::new("admin", "secret"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("No session ID returned"));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("admin", "hunter2"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
