//! Runner configuration
//!
//! Defines the appliance connection, the job pair to run and the polling
//! limits. Everything is read once at startup and passed into the runner.

use anyhow::{Context, Result};
use cdm_client::Credentials;
use std::time::Duration;

use crate::scheduler::PollPolicy;

/// Runner configuration
#[derive(Clone)]
pub struct Config {
    /// API base URL (e.g., "https://cdm.example:8443/api")
    pub base_url: String,

    pub username: String,

    pub password: String,

    /// Job started first and awaited
    pub job_a: String,

    /// Job started only if `job_a` succeeds
    pub job_b: String,

    /// SLA policy applied to both jobs
    pub policy_id: String,

    /// Delay between status requests
    pub poll_interval: Duration,

    /// Maximum status requests per awaited job (`None` = unbounded)
    pub max_polls: Option<u32>,

    /// Maximum time to wait on one job (`None` = unbounded)
    pub max_wait: Option<Duration>,

    /// Consecutive failed status requests tolerated before giving up
    pub transport_retries: u32,

    /// Accept self-signed appliance certificates
    pub insecure_tls: bool,

    /// Await the secondary job too instead of only starting it
    pub wait_secondary: bool,
}

impl Config {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
    pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(6 * 60 * 60);

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - CDM_BASE_URL, CDM_USERNAME, CDM_PASSWORD (required)
    /// - CDM_JOB_A, CDM_JOB_B, CDM_POLICY_ID (required)
    /// - CDM_POLL_INTERVAL (optional, seconds, default: 30)
    /// - CDM_MAX_POLLS (optional, default: unbounded)
    /// - CDM_MAX_WAIT (optional, seconds, default: 21600, 0 = unbounded)
    /// - CDM_TRANSPORT_RETRIES (optional, default: 0)
    /// - CDM_INSECURE_TLS (optional, default: true)
    /// - CDM_WAIT_SECONDARY (optional, default: false)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| anyhow::anyhow!("{} environment variable not set", key))
        };

        let poll_interval = match lookup("CDM_POLL_INTERVAL") {
            Some(raw) => Duration::from_secs(parse_number(&raw, "CDM_POLL_INTERVAL")?),
            None => Self::DEFAULT_POLL_INTERVAL,
        };

        let max_polls = lookup("CDM_MAX_POLLS")
            .map(|raw| parse_number::<u32>(&raw, "CDM_MAX_POLLS"))
            .transpose()?;

        let max_wait = match lookup("CDM_MAX_WAIT") {
            Some(raw) => match parse_number::<u64>(&raw, "CDM_MAX_WAIT")? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            None => Some(Self::DEFAULT_MAX_WAIT),
        };

        let transport_retries: u32 = lookup("CDM_TRANSPORT_RETRIES")
            .map(|raw| parse_number(&raw, "CDM_TRANSPORT_RETRIES"))
            .transpose()?
            .unwrap_or(0);

        let insecure_tls = lookup("CDM_INSECURE_TLS")
            .map(|raw| parse_flag(&raw, "CDM_INSECURE_TLS"))
            .transpose()?
            .unwrap_or(true);

        let wait_secondary = lookup("CDM_WAIT_SECONDARY")
            .map(|raw| parse_flag(&raw, "CDM_WAIT_SECONDARY"))
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            base_url: required("CDM_BASE_URL")?,
            username: required("CDM_USERNAME")?,
            password: required("CDM_PASSWORD")?,
            job_a: required("CDM_JOB_A")?,
            job_b: required("CDM_JOB_B")?,
            policy_id: required("CDM_POLICY_ID")?,
            poll_interval,
            max_polls,
            max_wait,
            transport_retries,
            insecure_tls,
            wait_secondary,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.username.is_empty() {
            anyhow::bail!("username cannot be empty");
        }

        if self.job_a.is_empty() || self.job_b.is_empty() {
            anyhow::bail!("job identifiers cannot be empty");
        }

        if self.job_a == self.job_b {
            anyhow::bail!("job_a and job_b must be different jobs");
        }

        if self.policy_id.is_empty() {
            anyhow::bail!("policy_id cannot be empty");
        }

        if self.poll_interval.as_secs() == 0 {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.max_polls == Some(0) {
            anyhow::bail!("max_polls must be greater than 0");
        }

        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: self.poll_interval,
            max_polls: self.max_polls,
            max_wait: self.max_wait,
            transport_retries: self.transport_retries,
        }
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, raw))
}

fn parse_flag(raw: &str, key: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "true" | "on" => Ok(true),
        "0" | "n" | "no" | "false" | "off" => Ok(false),
        _ => anyhow::bail!("{} must be a boolean, got {:?}", key, raw),
    }
}
