//! HTTP API request/response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `POST /api/incidents` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    #[serde(default)]
    pub address: Option<String>,
    /// Any JSON number; whole numbers 0..=255 pass validation
    #[serde(default)]
    pub severity: Option<f64>,
    pub reporter_id: String,
}

/// `POST /api/incidents/{id}/comments` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub body: String,
    pub author_id: String,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One entry of `GET /debug/presence`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceDetailDto {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub last_updated: DateTime<Utc>,
}
