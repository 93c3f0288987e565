use crate::core::{
    scoring::{score_candidates, weight_vector},
    tags::DEFAULT_TAG_WEIGHT,
    vectorizer::vectorize_tag_sets,
};
use crate::models::{Pet, RankedPet};
use std::collections::HashMap;

/// Result of a ranking pass
#[derive(Debug)]
pub struct RankedOutcome {
    pub recommendations: Vec<RankedPet>,
    pub total_candidates: usize,
}

/// Ranking orchestrator for the recommendation read path
///
/// # Pipeline stages
/// 1. Vectorize the adopter's flattened preferences and every candidate's
///    tags over a shared per-call vocabulary
/// 2. Materialize the weight vector from the adopter's tag weights
/// 3. Score each candidate with weighted cosine similarity
/// 4. Sort descending by score and truncate
///
/// Pure: no I/O, no side effects, deterministic for identical inputs.
#[derive(Debug, Clone)]
pub struct Recommender {
    default_weight: f64,
}

impl Recommender {
    pub fn new(default_weight: f64) -> Self {
        Self { default_weight }
    }

    pub fn with_default_weight() -> Self {
        Self {
            default_weight: DEFAULT_TAG_WEIGHT,
        }
    }

    /// Rank candidates against an adopter's preferences
    ///
    /// # Arguments
    /// * `query_tags` - The adopter's flattened preference tags
    /// * `tag_weights` - The adopter's explicit tag weights
    /// * `candidates` - Eligible pets in load order (already filtered of
    ///   denied ids by the caller)
    /// * `limit` - Maximum results to return; 0 means return all
    ///
    /// Ties preserve candidate load order (stable sort).
    pub fn rank(
        &self,
        query_tags: &[String],
        tag_weights: &HashMap<String, f64>,
        candidates: Vec<Pet>,
        limit: usize,
    ) -> RankedOutcome {
        let total_candidates = candidates.len();

        let candidate_tags: Vec<Vec<String>> =
            candidates.iter().map(|pet| pet.tags.clone()).collect();

        let (vocabulary, query_vector, candidate_vectors) =
            vectorize_tag_sets(query_tags, &candidate_tags);
        let weights = weight_vector(&vocabulary, tag_weights, self.default_weight);
        let scores = score_candidates(&query_vector, &candidate_vectors, &weights);

        let mut recommendations: Vec<RankedPet> = candidates
            .into_iter()
            .zip(scores)
            .map(|(pet, score)| RankedPet {
                pet_id: pet.id,
                name: pet.name,
                species: pet.species,
                age_months: pet.age_months,
                description: pet.description,
                tags: pet.tags,
                score,
            })
            .collect();

        // sort_by is stable, so equal scores keep load order
        recommendations.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if limit > 0 {
            recommendations.truncate(limit);
        }

        RankedOutcome {
            recommendations,
            total_candidates,
        }
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_default_weight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PetStatus;
    use uuid::Uuid;

    fn create_pet(name: &str, tags: &[&str]) -> Pet {
        Pet {
            id: Uuid::new_v4(),
            shelter_id: Uuid::new_v4(),
            name: name.to_string(),
            species: "dog".to_string(),
            age_months: Some(24),
            description: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            status: PetStatus::Available,
            created_at: None,
        }
    }

    fn query(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_rank_orders_by_descending_score() {
        let recommender = Recommender::with_default_weight();
        let candidates = vec![
            create_pet("partial", &["small"]),
            create_pet("exact", &["high", "small"]),
        ];

        let result = recommender.rank(&query(&["high", "small"]), &HashMap::new(), candidates, 0);

        assert_eq!(result.total_candidates, 2);
        assert_eq!(result.recommendations[0].name, "exact");
        assert!(result.recommendations[0].score > result.recommendations[1].score);
    }

    #[test]
    fn test_weighted_worked_example() {
        // Adopter prefs {energy: [high], size: [small]}, weight high=2.0.
        // Pet A [high, small] scores 1.0 exactly; Pet B [small] scores
        // 1/sqrt(5) rounded to 0.4472.
        let recommender = Recommender::with_default_weight();
        let candidates = vec![
            create_pet("A", &["high", "small"]),
            create_pet("B", &["small"]),
        ];
        let mut weights = HashMap::new();
        weights.insert("high".to_string(), 2.0);

        let result = recommender.rank(&query(&["high", "small"]), &weights, candidates, 0);

        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(result.recommendations[0].name, "A");
        assert_eq!(result.recommendations[0].score, 1.0);
        assert_eq!(result.recommendations[1].name, "B");
        assert_eq!(result.recommendations[1].score, 0.4472);
    }

    #[test]
    fn test_limit_truncates_and_zero_returns_all() {
        let recommender = Recommender::with_default_weight();
        let candidates = vec![
            create_pet("A", &["high", "small"]),
            create_pet("B", &["small"]),
        ];
        let mut weights = HashMap::new();
        weights.insert("high".to_string(), 2.0);

        let limited =
            recommender.rank(&query(&["high", "small"]), &weights, candidates.clone(), 1);
        assert_eq!(limited.recommendations.len(), 1);
        assert_eq!(limited.recommendations[0].name, "A");
        assert_eq!(limited.total_candidates, 2);

        let all = recommender.rank(&query(&["high", "small"]), &weights, candidates, 0);
        assert_eq!(all.recommendations.len(), 2);
    }

    #[test]
    fn test_ties_preserve_load_order() {
        let recommender = Recommender::with_default_weight();
        let candidates = vec![
            create_pet("first", &["calm"]),
            create_pet("second", &["calm"]),
            create_pet("third", &["calm"]),
        ];

        let result = recommender.rank(&query(&["calm"]), &HashMap::new(), candidates, 0);

        let names: Vec<&str> = result
            .recommendations
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_tagless_inputs_score_zero() {
        let recommender = Recommender::with_default_weight();
        let candidates = vec![create_pet("bare", &[]), create_pet("tagged", &["calm"])];

        let result = recommender.rank(&[], &HashMap::new(), candidates, 0);

        assert!(result.recommendations.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_empty_candidates_is_empty_result() {
        let recommender = Recommender::with_default_weight();
        let result = recommender.rank(&query(&["calm"]), &HashMap::new(), Vec::new(), 5);

        assert!(result.recommendations.is_empty());
        assert_eq!(result.total_candidates, 0);
    }
}
