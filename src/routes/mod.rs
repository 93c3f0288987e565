// Route exports
pub mod matches;
pub mod recommendations;

use crate::config::MatchingSettings;
use crate::core::Recommender;
use crate::services::{AdoptionStore, CacheManager, MatchLedger, TokenVerifier};
use actix_web::web;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AdoptionStore>,
    pub ledger: Arc<MatchLedger>,
    pub cache: Arc<CacheManager>,
    pub verifier: Arc<TokenVerifier>,
    pub recommender: Recommender,
    pub matching: MatchingSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(recommendations::configure)
            .configure(matches::configure),
    );
}
