//! Request and response bodies. Field names are camelCase on the wire.

use archsched_core::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/schedule/share`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    pub tasks: Vec<Task>,
    pub expiry_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateShareResponse {
    pub url: String,
}

/// Body of a successful `GET /api/schedule/share/{share_id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedScheduleResponse<'a> {
    pub tasks: &'a [Task],
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
