//! SLA policy DTOs

use serde::{Deserialize, Serialize};

use crate::domain::policy::StoragePolicy;

/// Body returned by `GET /spec/storageprofile`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyList {
    #[serde(rename = "storageprofiles", default)]
    pub policies: Vec<StoragePolicy>,
}
