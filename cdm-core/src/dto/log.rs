//! Log DTOs

use serde::{Deserialize, Serialize};

use crate::domain::log::LogEntry;

/// Body returned by a job's `lastrunlog` link
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogPage {
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}
