//! PawMatch Algo - recommendation and match-lifecycle service for the
//! PawMatch pet-adoption platform
//!
//! This library scores shelter animals against an adopter's weighted tag
//! preferences via weighted cosine similarity, and governs the
//! pending/adopted/denied lifecycle of (adopter, pet) pairings with
//! database-backed exclusivity guarantees.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{vectorize_tag_sets, Recommender, TagVocabulary};
pub use models::{Adopter, Pet, PetStatus, RankedPet, RecommendationsResponse};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let tags = vec!["calm".to_string(), "senior".to_string()];
        let (vocab, query, _) = vectorize_tag_sets(&tags, &[]);
        assert_eq!(vocab.len(), 2);
        assert_eq!(query, vec![1.0, 1.0]);
    }
}
