//! CDM HTTP Client
//!
//! A small, typed client for the backup appliance's "endeavour" REST API.
//!
//! Every call except login needs a [`Session`], obtained with
//! [`BackupClient::login`] and sent as the `X-Endeavour-Sessionid` header.
//!
//! # Example
//!
//! ```no_run
//! use cdm_client::{BackupClient, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BackupClient::insecure("https://cdm.example:8443/api")?;
//!     let session = client.login(&Credentials::new("admin", "secret")).await?;
//!
//!     for job in client.list_jobs(&session).await? {
//!         println!("{} {}", job.id, job.status);
//!     }
//!     Ok(())
//! }
//! ```

mod api;
pub mod error;
mod jobs;
mod logs;
mod policies;
mod session;

// Re-export commonly used types
pub use api::BackupApi;
pub use error::{ClientError, Result};
pub use session::{Credentials, Session};

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

/// Header carrying the session token on authenticated calls
pub const SESSION_HEADER: &str = "X-Endeavour-Sessionid";

/// HTTP client for the appliance API
///
/// Methods are grouped by resource:
/// - Session login
/// - Jobs (list, get, status, start)
/// - SLA policies
/// - Job logs
#[derive(Debug, Clone)]
pub struct BackupClient {
    /// Base URL of the API (e.g., "https://cdm.example:8443/api")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl BackupClient {
    /// Create a new client that validates server certificates
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API (e.g., "https://cdm.example:8443/api")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use cdm_client::BackupClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = BackupClient::with_client("https://cdm.example:8443/api", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a client that accepts any server certificate
    ///
    /// Appliances commonly ship self-signed certificates; whether to trust
    /// them is the caller's deployment decision.
    pub fn insecure(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request carrying the session header
    fn authed(&self, method: Method, url: &str, session: &Session) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(SESSION_HEADER, session.id())
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = BackupClient::new("https://cdm.example:8443/api");
        assert_eq!(client.base_url(), "https://cdm.example:8443/api");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = BackupClient::new("https://cdm.example:8443/api/");
        assert_eq!(client.base_url(), "https://cdm.example:8443/api");
    }

    #[test]
    fn test_insecure_client() {
        let client = BackupClient::insecure("https://10.0.0.5:8443/api").unwrap();
        assert_eq!(client.url("/endeavour/job"), "https://10.0.0.5:8443/api/endeavour/job");
    }

    #[tokio::test]
    async fn test_error_status_becomes_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/spec/storageprofile")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = BackupClient::new(server.url());
        let err = client
            .list_policies(&Session::new("abc"))
            .await
            .unwrap_err();

        assert!(err.is_server_error());
        assert!(err.to_string().contains("boom"));
    }
}
