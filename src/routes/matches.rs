use crate::models::{
    AuditTotalsQuery, AuditTotalsResponse, CompleteMatchResponse, DenyMatchResponse,
    ErrorResponse, HealthResponse, MatchActionRequest, ProposeMatchResponse,
};
use crate::routes::AppState;
use crate::services::{AuditFilter, AuthError, CacheKey, LedgerError};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

/// Configure the match lifecycle routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches", web::post().to(propose_match))
        .route("/matches/complete", web::post().to(complete_match))
        .route("/matches/deny", web::post().to(deny_match))
        .route("/audit/totals", web::get().to(audit_totals));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Check the caller's bearer token against the adopter they act for
fn authorize_caller(
    http_req: &HttpRequest,
    state: &AppState,
    adopter_id: uuid::Uuid,
) -> Result<(), HttpResponse> {
    let header = http_req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = state.verifier.verify(header).map_err(|e| match e {
        AuthError::Forbidden(_) => forbidden_response(&e),
        _ => HttpResponse::Unauthorized().json(ErrorResponse {
            error: "Unauthorized".to_string(),
            message: e.to_string(),
            status_code: 401,
        }),
    })?;

    state
        .verifier
        .authorize_adopter(&claims, adopter_id)
        .map_err(|e| forbidden_response(&e))
}

fn forbidden_response(error: &AuthError) -> HttpResponse {
    HttpResponse::Forbidden().json(ErrorResponse {
        error: "Forbidden".to_string(),
        message: error.to_string(),
        status_code: 403,
    })
}

/// Map ledger error kinds to transport-level statuses
fn ledger_error_response(error: &LedgerError) -> HttpResponse {
    match error {
        LedgerError::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: message.clone(),
            status_code: 404,
        }),
        LedgerError::Conflict(message) => HttpResponse::Conflict().json(ErrorResponse {
            error: "Conflict".to_string(),
            message: message.clone(),
            status_code: 409,
        }),
        LedgerError::OperationFailed(e) => {
            tracing::error!("Ledger operation failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Operation failed".to_string(),
                message: "match lifecycle operation failed".to_string(),
                status_code: 500,
            })
        }
    }
}

/// Propose a match endpoint
///
/// POST /api/v1/matches
///
/// Request body:
/// ```json
/// {
///   "adopterId": "uuid",
///   "petId": "uuid"
/// }
/// ```
async fn propose_match(
    state: web::Data<AppState>,
    req: web::Json<MatchActionRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(response) = authorize_caller(&http_req, &state, req.adopter_id) {
        return response;
    }

    tracing::info!(
        "Proposing match: adopter {} -> pet {}",
        req.adopter_id,
        req.pet_id
    );

    match state.ledger.propose(req.adopter_id, req.pet_id).await {
        Ok(match_id) => HttpResponse::Created().json(ProposeMatchResponse {
            match_id,
            status: "pending".to_string(),
        }),
        Err(e) => ledger_error_response(&e),
    }
}

/// Complete a match endpoint
///
/// POST /api/v1/matches/complete
///
/// Finalizes the adoption and rejects every competing suitor for the pet.
async fn complete_match(
    state: web::Data<AppState>,
    req: web::Json<MatchActionRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(response) = authorize_caller(&http_req, &state, req.adopter_id) {
        return response;
    }

    tracing::info!(
        "Completing match: adopter {} -> pet {}",
        req.adopter_id,
        req.pet_id
    );

    match state.ledger.complete(req.adopter_id, req.pet_id).await {
        Ok(adoption_id) => HttpResponse::Ok().json(CompleteMatchResponse { adoption_id }),
        Err(e) => ledger_error_response(&e),
    }
}

/// Deny a match endpoint
///
/// POST /api/v1/matches/deny
///
/// Permanently excludes the pet from the adopter's recommendations.
async fn deny_match(
    state: web::Data<AppState>,
    req: web::Json<MatchActionRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(response) = authorize_caller(&http_req, &state, req.adopter_id) {
        return response;
    }

    tracing::info!(
        "Denying match: adopter {} -> pet {}",
        req.adopter_id,
        req.pet_id
    );

    match state.ledger.deny(req.adopter_id, req.pet_id).await {
        Ok(denial_id) => {
            // The cached denied set is now stale for this adopter
            let cache_key = CacheKey::denied_set(req.adopter_id);
            if let Err(e) = state.cache.delete(&cache_key).await {
                tracing::warn!("Failed to invalidate denied set cache: {}", e);
            }

            HttpResponse::Ok().json(DenyMatchResponse { denial_id })
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// Audit totals endpoint
///
/// GET /api/v1/audit/totals?shelterId=&adopterId=&petId=&limit=
///
/// Read-only report over the append-only match event log, newest first.
async fn audit_totals(
    state: web::Data<AppState>,
    query: web::Query<AuditTotalsQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let filter = AuditFilter {
        shelter_id: query.shelter_id,
        adopter_id: query.adopter_id,
        pet_id: query.pet_id,
        limit: query.limit,
    };

    match state.ledger.audit_totals(&filter).await {
        Ok(totals) => {
            let count = totals.len();
            HttpResponse::Ok().json(AuditTotalsResponse { totals, count })
        }
        Err(e) => {
            tracing::error!("Failed to load audit totals: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to load audit totals".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
