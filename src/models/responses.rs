use crate::models::domain::{MatchTotal, RankedPet};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RankedPet>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for a successful propose
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposeMatchResponse {
    #[serde(rename = "matchId")]
    pub match_id: Uuid,
    pub status: String,
}

/// Response for a successful complete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteMatchResponse {
    #[serde(rename = "adoptionId")]
    pub adoption_id: Uuid,
}

/// Response for a successful deny
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenyMatchResponse {
    #[serde(rename = "denialId")]
    pub denial_id: Uuid,
}

/// Response for the audit totals endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditTotalsResponse {
    pub totals: Vec<MatchTotal>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
