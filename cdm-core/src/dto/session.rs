//! Session DTOs

use serde::{Deserialize, Serialize};

/// Body returned by `POST /endeavour/session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    #[serde(rename = "sessionid", default)]
    pub session_id: Option<String>,
}
