use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Adopter profile with tag preferences and per-tag weights
///
/// Rows are owned by the external account subsystem; this service only reads
/// them. `tag_prefs` maps a preference category to one-or-many tag values and
/// `tag_weights` maps an individual tag to its importance (1.0 when absent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adopter {
    pub id: Uuid,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub email: String,
    #[serde(rename = "tagPrefs", default)]
    pub tag_prefs: BTreeMap<String, Vec<String>>,
    #[serde(rename = "tagWeights", default)]
    pub tag_weights: HashMap<String, f64>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Adopter {
    /// Flattened query tag collection: category order, then value order.
    pub fn query_tags(&self) -> Vec<String> {
        crate::core::tags::flatten_prefs(&self.tag_prefs)
    }
}

/// Availability status of a pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pet_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Adopted,
}

/// Shelter animal with descriptive tags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: Uuid,
    #[serde(rename = "shelterId")]
    pub shelter_id: Uuid,
    pub name: String,
    pub species: String,
    #[serde(rename = "ageMonths", default)]
    pub age_months: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: PetStatus,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Pet {
    /// Helper to check availability, the only status recommendations care about
    pub fn available(&self) -> bool {
        self.status == PetStatus::Available
    }
}

/// Pending edge between one adopter and one pet
///
/// At most one row per (adopter, pet) pair; enforced by a database unique
/// constraint, not application sequencing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingMatch {
    pub id: Uuid,
    pub adopter_id: Uuid,
    pub pet_id: Uuid,
    pub proposed_at: chrono::DateTime<chrono::Utc>,
}

/// Terminal record finalizing a pet's placement; at most one per pet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adoption {
    pub id: Uuid,
    pub adopter_id: Uuid,
    pub pet_id: Uuid,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// Terminal record permanently excluding a pet from an adopter's rankings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Denial {
    pub id: Uuid,
    pub adopter_id: Uuid,
    pub pet_id: Uuid,
    pub denied_at: chrono::DateTime<chrono::Utc>,
}

/// Lifecycle events recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_event", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchEvent {
    Proposed,
    Adopted,
    Denied,
}

/// Append-only audit row, written in the same transaction as the lifecycle
/// mutation it records; read-only reporting surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchTotal {
    pub id: Uuid,
    #[serde(rename = "shelterId")]
    pub shelter_id: Uuid,
    #[serde(rename = "adopterId")]
    pub adopter_id: Uuid,
    #[serde(rename = "petId")]
    pub pet_id: Uuid,
    pub event: MatchEvent,
    #[serde(rename = "recordedAt")]
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// Scored recommendation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPet {
    #[serde(rename = "petId")]
    pub pet_id: Uuid,
    pub name: String,
    pub species: String,
    #[serde(rename = "ageMonths")]
    pub age_months: Option<i32>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub score: f64,
}
