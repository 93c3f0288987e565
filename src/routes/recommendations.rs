use crate::models::{ErrorResponse, RecommendationsQuery, RecommendationsResponse};
use crate::routes::AppState;
use crate::services::{CacheKey, StoreError};
use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Configure the recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/recommendations/{adopter_id}",
        web::get().to(get_recommendations),
    );
}

/// Ranked recommendations endpoint
///
/// GET /api/v1/recommendations/{adopterId}?limit=N
///
/// Returns candidate pets ordered by descending weighted cosine similarity
/// against the adopter's tag preferences. `limit` of 0 or absent returns all
/// eligible candidates; no eligible candidates is an empty list, not an
/// error. Pure read path.
async fn get_recommendations(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<RecommendationsQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let adopter_id = path.into_inner();

    let adopter = match state.store.get_adopter(adopter_id).await {
        Ok(adopter) => adopter,
        Err(StoreError::NotFound(message)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "adopter not found".to_string(),
                message,
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to resolve adopter {}: {}", adopter_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to resolve adopter".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    // Denied set through the cache; a stale set is acceptable, the database
    // remains the source of truth on the next write.
    let cache_key = CacheKey::denied_set(adopter_id);
    let denied = match state.cache.get::<Vec<Uuid>>(&cache_key).await {
        Ok(denied) => denied,
        Err(_) => match state.ledger.denied_pet_ids(adopter_id).await {
            Ok(denied) => {
                if let Err(e) = state.cache.set(&cache_key, &denied).await {
                    tracing::warn!("Failed to cache denied set for {}: {}", adopter_id, e);
                }
                denied
            }
            Err(e) => {
                tracing::error!("Failed to load denied set for {}: {}", adopter_id, e);
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to load denial ledger".to_string(),
                    message: e.to_string(),
                    status_code: 500,
                });
            }
        },
    };

    let candidates = match state
        .store
        .list_candidates(&denied, state.matching.include_adopted)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to load candidates for {}: {}", adopter_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to load candidates".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    if candidates.is_empty() {
        return HttpResponse::Ok().json(RecommendationsResponse {
            recommendations: vec![],
            total_candidates: 0,
        });
    }

    // 0 means "return all"; the configured cap only applies to positive limits
    let mut limit = query.limit.unwrap_or(0) as usize;
    if limit > 0 {
        if let Some(max) = state.matching.max_limit {
            limit = limit.min(max as usize);
        }
    }

    let query_tags = adopter.query_tags();
    let result = state
        .recommender
        .rank(&query_tags, &adopter.tag_weights, candidates, limit);

    tracing::info!(
        "Returning {} recommendations for adopter {} (from {} candidates)",
        result.recommendations.len(),
        adopter_id,
        result.total_candidates
    );

    HttpResponse::Ok().json(RecommendationsResponse {
        recommendations: result.recommendations,
        total_candidates: result.total_candidates,
    })
}
