use serde::{Deserialize, Serialize};

use crate::core::scoring::CriterionScore;
use crate::models::domain::ScoredCandidate;

/// Response for the find-matches endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesResponse {
    pub matches: Vec<ScoredCandidate>,
    pub next_cursor: Option<String>,
    pub total_results: usize,
}

/// Response for the pair-score endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePairResponse {
    pub user_id: String,
    pub target_user_id: String,
    pub compatibility: u8,
    pub criteria: Vec<CriterionScore>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Record event response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEventResponse {
    pub success: bool,
    pub event_id: String,
}
