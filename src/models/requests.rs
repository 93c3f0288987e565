use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Body shared by the propose / complete / deny endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchActionRequest {
    #[serde(alias = "adopter_id", rename = "adopterId")]
    pub adopter_id: Uuid,
    #[serde(alias = "pet_id", rename = "petId")]
    pub pet_id: Uuid,
}

/// Query parameters for the recommendations endpoint
///
/// `limit` of 0 (or absent) means "return all"; positive values may still be
/// capped by `matching.max_limit`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationsQuery {
    #[validate(range(max = 1000))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Query parameters for the audit totals endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuditTotalsQuery {
    #[serde(alias = "shelter_id", rename = "shelterId", default)]
    pub shelter_id: Option<Uuid>,
    #[serde(alias = "adopter_id", rename = "adopterId", default)]
    pub adopter_id: Option<Uuid>,
    #[serde(alias = "pet_id", rename = "petId", default)]
    pub pet_id: Option<Uuid>,
    #[validate(range(min = 1, max = 1000))]
    #[serde(default)]
    pub limit: Option<u16>,
}
