//! Job log domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single line of a job session log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub log_time: Option<i64>,
    #[serde(default, rename = "type")]
    pub entry_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LogEntry {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.log_time.and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}
