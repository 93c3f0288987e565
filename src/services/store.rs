use crate::core::tags::{parse_tag_list, parse_tag_prefs, parse_tag_weights};
use crate::models::{Adopter, Pet, PetStatus};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when reading from the relational store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Read-side store for adopter and pet records
///
/// Adopter and pet rows are written by the external account and shelter
/// subsystems; this service only reads them. Malformed tag/weight payloads in
/// the JSONB columns are recovered here as empty collections so a bad profile
/// row never fails a recommendation request.
pub struct AdoptionStore {
    pool: PgPool,
}

impl AdoptionStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// The underlying pool, shared with the match ledger
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Resolve an adopter by id
    pub async fn get_adopter(&self, adopter_id: Uuid) -> Result<Adopter, StoreError> {
        let query = r#"
            SELECT id, display_name, email, tag_prefs, tag_weights, created_at
            FROM adopters
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(adopter_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("adopter {}", adopter_id)))?;

        let tag_prefs: serde_json::Value = row.get("tag_prefs");
        let tag_weights: serde_json::Value = row.get("tag_weights");

        Ok(Adopter {
            id: row.get("id"),
            display_name: row.get("display_name"),
            email: row.get("email"),
            tag_prefs: parse_tag_prefs(&tag_prefs),
            tag_weights: parse_tag_weights(&tag_weights),
            created_at: row.get("created_at"),
        })
    }

    /// Load candidate pets for a recommendation pass
    ///
    /// Excludes every pet in the adopter's denied set and, unless
    /// `include_adopted` is set, pets no longer available. Ordered by
    /// `(created_at, id)` so tie-breaking in the ranker is deterministic
    /// across calls.
    pub async fn list_candidates(
        &self,
        denied_pet_ids: &[Uuid],
        include_adopted: bool,
    ) -> Result<Vec<Pet>, StoreError> {
        let query = r#"
            SELECT id, shelter_id, name, species, age_months, description,
                   tags, status, created_at
            FROM pets
            WHERE id <> ALL($1)
              AND ($2 OR status = 'available')
            ORDER BY created_at, id
        "#;

        let rows = sqlx::query(query)
            .bind(denied_pet_ids)
            .bind(include_adopted)
            .fetch_all(&self.pool)
            .await?;

        let pets = rows
            .iter()
            .map(|row| {
                let tags: serde_json::Value = row.get("tags");
                Pet {
                    id: row.get("id"),
                    shelter_id: row.get("shelter_id"),
                    name: row.get("name"),
                    species: row.get("species"),
                    age_months: row.get("age_months"),
                    description: row.get("description"),
                    tags: parse_tag_list(&tags),
                    status: row.get::<PetStatus, _>("status"),
                    created_at: row.get("created_at"),
                }
            })
            .collect();

        Ok(pets)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
