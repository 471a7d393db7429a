use crate::models::domain::{MatchResult, TrendingAthlete};
use serde::{Deserialize, Serialize};

/// Response for both match-ranking endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchListResponse {
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_ready: bool,
    pub store_reachable: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Response after queueing campaign processing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessCampaignResponse {
    pub queued: bool,
    pub campaign_id: String,
}

/// Response for the trending athletes endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingResponse {
    pub athletes: Vec<TrendingAthlete>,
    pub count: usize,
}
