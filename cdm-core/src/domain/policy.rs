//! SLA policy domain types

use serde::{Deserialize, Serialize};

use crate::domain::job::string_or_number;

/// Storage (SLA) policy a job can be started under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoragePolicy {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}
