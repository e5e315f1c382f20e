//! Configuration module
//!
//! Connection settings shared by every command.

use anyhow::{Context, Result};
use cdm_client::{BackupClient, Credentials};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API base URL of the appliance
    pub base_url: String,
    pub credentials: Credentials,
    /// Skip server certificate validation
    pub insecure: bool,
}

impl Config {
    /// Build an API client for this configuration
    pub fn client(&self) -> Result<BackupClient> {
        if self.insecure {
            BackupClient::insecure(&self.base_url).context("Failed to build HTTP client")
        } else {
            Ok(BackupClient::new(&self.base_url))
        }
    }
}
