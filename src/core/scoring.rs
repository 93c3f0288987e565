use crate::core::tags::DEFAULT_TAG_WEIGHT;
use crate::core::vectorizer::TagVocabulary;
use std::collections::HashMap;

/// Similarity scores are rounded to this many decimal places so that equal
/// inputs compare equal across calls and render stably.
pub const SCORE_DECIMALS: i32 = 4;

/// Materialize the per-feature weight vector for a vocabulary.
///
/// Each feature takes the adopter's explicit weight for that tag, or
/// `default_weight` when the tag has no entry.
pub fn weight_vector(
    vocabulary: &TagVocabulary,
    tag_weights: &HashMap<String, f64>,
    default_weight: f64,
) -> Vec<f64> {
    vocabulary
        .terms()
        .iter()
        .map(|term| tag_weights.get(term).copied().unwrap_or(default_weight))
        .collect()
}

/// Cosine similarity of two vectors after scaling both elementwise by a
/// shared weight vector.
///
/// A zero-norm operand (empty vocabulary, tagless adopter or pet, or
/// all-zero weights) scores 0.0 — never a division by zero.
pub fn weighted_cosine(query: &[f64], candidate: &[f64], weights: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut query_norm_sq = 0.0;
    let mut candidate_norm_sq = 0.0;

    for ((&q, &c), &w) in query.iter().zip(candidate).zip(weights) {
        let wq = q * w;
        let wc = c * w;
        dot += wq * wc;
        query_norm_sq += wq * wq;
        candidate_norm_sq += wc * wc;
    }

    if query_norm_sq == 0.0 || candidate_norm_sq == 0.0 {
        return 0.0;
    }

    dot / (query_norm_sq.sqrt() * candidate_norm_sq.sqrt())
}

/// Round a raw similarity to [`SCORE_DECIMALS`] places and clamp into [0, 1].
#[inline]
pub fn round_score(raw: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    ((raw * factor).round() / factor).clamp(0.0, 1.0)
}

/// Score every candidate vector against the query under a shared weight
/// vector. Returns one rounded score per candidate, in input order.
pub fn score_candidates(query: &[f64], candidates: &[Vec<f64>], weights: &[f64]) -> Vec<f64> {
    candidates
        .iter()
        .map(|candidate| round_score(weighted_cosine(query, candidate, weights)))
        .collect()
}

/// Convenience for callers that only have tag collections: builds the weight
/// vector with [`DEFAULT_TAG_WEIGHT`] for unweighted tags.
pub fn default_weight_vector(
    vocabulary: &TagVocabulary,
    tag_weights: &HashMap<String, f64>,
) -> Vec<f64> {
    weight_vector(vocabulary, tag_weights, DEFAULT_TAG_WEIGHT)
}
