use crate::models::{MatchEvent, MatchTotal, PetStatus};
use sqlx::{PgPool, Row};
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by match lifecycle operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Operation failed: {0}")]
    OperationFailed(#[from] sqlx::Error),
}

/// Filter for the audit totals report
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub shelter_id: Option<Uuid>,
    pub adopter_id: Option<Uuid>,
    pub pet_id: Option<Uuid>,
    pub limit: Option<u16>,
}

/// State machine for the (adopter, pet) match lifecycle
///
/// States per pair: none -> pending -> {adopted, denied}. Terminal states
/// admit no transitions; a denied pair never returns to pending.
///
/// Every operation runs in a single transaction. Pair uniqueness and
/// pet-adoption exclusivity are enforced by database unique constraints, so
/// two racing calls cannot both succeed; the loser observes the deleted
/// pending row or the unique violation. An audit row is appended inside the
/// same transaction as the mutation it records.
pub struct MatchLedger {
    pool: PgPool,
}

impl MatchLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending match for the pair
    ///
    /// Fails with `Conflict` when the pair already has a pending match or sits
    /// in a terminal state (denied pairs are excluded permanently, adopted
    /// pets accept no new suitors). Fails with `NotFound` when the pet or
    /// adopter does not exist.
    pub async fn propose(&self, adopter_id: Uuid, pet_id: Uuid) -> Result<Uuid, LedgerError> {
        let mut tx = self.pool.begin().await?;

        let pet = sqlx::query("SELECT shelter_id, status FROM pets WHERE id = $1")
            .bind(pet_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("pet {}", pet_id)))?;

        let shelter_id: Uuid = pet.get("shelter_id");
        let status: PetStatus = pet.get("status");
        if status == PetStatus::Adopted {
            return Err(LedgerError::Conflict(format!(
                "pet {} has already been adopted",
                pet_id
            )));
        }

        // Terminal pairs never re-enter pending
        let terminal: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT 1 FROM denials WHERE adopter_id = $1 AND pet_id = $2
            UNION ALL
            SELECT 1 FROM adoptions WHERE adopter_id = $1 AND pet_id = $2
            "#,
        )
        .bind(adopter_id)
        .bind(pet_id)
        .fetch_optional(&mut *tx)
        .await?;

        if terminal.is_some() {
            return Err(LedgerError::Conflict(format!(
                "pair ({}, {}) is in a terminal state",
                adopter_id, pet_id
            )));
        }

        let match_id = Uuid::new_v4();
        let inserted = sqlx::query(
            "INSERT INTO matches (id, adopter_id, pet_id) VALUES ($1, $2, $3)",
        )
        .bind(match_id)
        .bind(adopter_id)
        .bind(pet_id)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            return Err(classify_insert_error(
                e,
                format!("match already pending for pair ({}, {})", adopter_id, pet_id),
                format!("adopter {}", adopter_id),
            ));
        }

        record_event(&mut tx, shelter_id, adopter_id, pet_id, MatchEvent::Proposed).await?;

        tx.commit().await?;

        tracing::info!(
            "Proposed match {} for adopter {} and pet {}",
            match_id,
            adopter_id,
            pet_id
        );

        Ok(match_id)
    }

    /// Finalize the pair's pending match as an adoption
    ///
    /// Atomically inserts the Adoption, deletes every pending match for the
    /// pet (competing suitors included), flips the pet's status to `adopted`,
    /// and appends the audit row. Fails with `NotFound` when the pair has no
    /// pending match; the unique constraint on `adoptions.pet_id` turns a
    /// lost race into `Conflict`.
    pub async fn complete(&self, adopter_id: Uuid, pet_id: Uuid) -> Result<Uuid, LedgerError> {
        let mut tx = self.pool.begin().await?;

        // Lock the pending row so racing completions serialize on it
        let pending = sqlx::query(
            r#"
            SELECT m.id, p.shelter_id
            FROM matches m
            JOIN pets p ON p.id = m.pet_id
            WHERE m.adopter_id = $1 AND m.pet_id = $2
            FOR UPDATE OF m
            "#,
        )
        .bind(adopter_id)
        .bind(pet_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            LedgerError::NotFound(format!(
                "match not found for pair ({}, {})",
                adopter_id, pet_id
            ))
        })?;

        let shelter_id: Uuid = pending.get("shelter_id");

        let adoption_id = Uuid::new_v4();
        let inserted = sqlx::query(
            "INSERT INTO adoptions (id, adopter_id, pet_id) VALUES ($1, $2, $3)",
        )
        .bind(adoption_id)
        .bind(adopter_id)
        .bind(pet_id)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            return Err(classify_insert_error(
                e,
                format!("pet {} has already been adopted", pet_id),
                format!("adopter {}", adopter_id),
            ));
        }

        // Reject all competing suitors for this pet in one sweep
        let dropped = sqlx::query("DELETE FROM matches WHERE pet_id = $1")
            .bind(pet_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE pets SET status = $1 WHERE id = $2")
            .bind(PetStatus::Adopted)
            .bind(pet_id)
            .execute(&mut *tx)
            .await?;

        record_event(&mut tx, shelter_id, adopter_id, pet_id, MatchEvent::Adopted).await?;

        tx.commit().await?;

        tracing::info!(
            "Completed adoption {} for adopter {} and pet {} ({} pending matches removed)",
            adoption_id,
            adopter_id,
            pet_id,
            dropped.rows_affected()
        );

        Ok(adoption_id)
    }

    /// Deny the pair's pending match
    ///
    /// Atomically inserts the Denial and deletes only this pair's pending
    /// match; sibling matches on the same pet from other adopters are
    /// untouched. Fails with `NotFound` when the pair has no pending match,
    /// so a repeat deny succeeds at most once.
    pub async fn deny(&self, adopter_id: Uuid, pet_id: Uuid) -> Result<Uuid, LedgerError> {
        let mut tx = self.pool.begin().await?;

        let pending = sqlx::query(
            r#"
            SELECT m.id, p.shelter_id
            FROM matches m
            JOIN pets p ON p.id = m.pet_id
            WHERE m.adopter_id = $1 AND m.pet_id = $2
            FOR UPDATE OF m
            "#,
        )
        .bind(adopter_id)
        .bind(pet_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            LedgerError::NotFound(format!(
                "match not found for pair ({}, {})",
                adopter_id, pet_id
            ))
        })?;

        let match_id: Uuid = pending.get("id");
        let shelter_id: Uuid = pending.get("shelter_id");

        let denial_id = Uuid::new_v4();
        let inserted = sqlx::query(
            "INSERT INTO denials (id, adopter_id, pet_id) VALUES ($1, $2, $3)",
        )
        .bind(denial_id)
        .bind(adopter_id)
        .bind(pet_id)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            return Err(classify_insert_error(
                e,
                format!("pair ({}, {}) is already denied", adopter_id, pet_id),
                format!("adopter {}", adopter_id),
            ));
        }

        sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await?;

        record_event(&mut tx, shelter_id, adopter_id, pet_id, MatchEvent::Denied).await?;

        tx.commit().await?;

        tracing::info!(
            "Denied match {} for adopter {} and pet {}",
            match_id,
            adopter_id,
            pet_id
        );

        Ok(denial_id)
    }

    /// The adopter's permanent exclusion set for candidate filtering
    pub async fn denied_pet_ids(&self, adopter_id: Uuid) -> Result<Vec<Uuid>, LedgerError> {
        let rows = sqlx::query("SELECT pet_id FROM denials WHERE adopter_id = $1")
            .bind(adopter_id)
            .fetch_all(&self.pool)
            .await?;

        let denied: Vec<Uuid> = rows.iter().map(|row| row.get("pet_id")).collect();

        tracing::debug!("Adopter {} has denied {} pets", adopter_id, denied.len());

        Ok(denied)
    }

    /// Read-only audit report over the append-only totals log, newest first
    pub async fn audit_totals(&self, filter: &AuditFilter) -> Result<Vec<MatchTotal>, LedgerError> {
        let query = r#"
            SELECT id, shelter_id, adopter_id, pet_id, event, recorded_at
            FROM match_totals
            WHERE ($1::uuid IS NULL OR shelter_id = $1)
              AND ($2::uuid IS NULL OR adopter_id = $2)
              AND ($3::uuid IS NULL OR pet_id = $3)
            ORDER BY recorded_at DESC, id
            LIMIT $4
        "#;

        let limit = i64::from(filter.limit.unwrap_or(500));

        let rows = sqlx::query(query)
            .bind(filter.shelter_id)
            .bind(filter.adopter_id)
            .bind(filter.pet_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let totals = rows
            .iter()
            .map(|row| MatchTotal {
                id: row.get("id"),
                shelter_id: row.get("shelter_id"),
                adopter_id: row.get("adopter_id"),
                pet_id: row.get("pet_id"),
                event: row.get::<MatchEvent, _>("event"),
                recorded_at: row.get("recorded_at"),
            })
            .collect();

        Ok(totals)
    }
}

/// Append an audit row inside the caller's transaction
async fn record_event(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    shelter_id: Uuid,
    adopter_id: Uuid,
    pet_id: Uuid,
    event: MatchEvent,
) -> Result<(), LedgerError> {
    sqlx::query(
        r#"
        INSERT INTO match_totals (id, shelter_id, adopter_id, pet_id, event)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(shelter_id)
    .bind(adopter_id)
    .bind(pet_id)
    .bind(event)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Map constraint violations on insert to the error taxonomy
fn classify_insert_error(
    error: sqlx::Error,
    conflict_message: String,
    missing_reference: String,
) -> LedgerError {
    match error.as_database_error() {
        Some(db) if db.is_unique_violation() => LedgerError::Conflict(conflict_message),
        Some(db) if db.is_foreign_key_violation() => LedgerError::NotFound(missing_reference),
        _ => LedgerError::OperationFailed(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_filter_default_is_unfiltered() {
        let filter = AuditFilter::default();
        assert!(filter.shelter_id.is_none());
        assert!(filter.adopter_id.is_none());
        assert!(filter.pet_id.is_none());
        assert!(filter.limit.is_none());
    }

    #[test]
    fn test_error_kinds_render_their_context() {
        let not_found = LedgerError::NotFound("match not found for pair (a, b)".to_string());
        assert!(not_found.to_string().contains("match not found"));

        let conflict = LedgerError::Conflict("pet x has already been adopted".to_string());
        assert!(conflict.to_string().starts_with("Conflict"));
    }
}
