// Unit tests for PawMatch Algo

use pawmatch_algo::core::{
    scoring::{round_score, score_candidates, weight_vector, weighted_cosine},
    tags::{flatten_prefs, parse_tag_list, parse_tag_prefs, parse_tag_weights},
    vectorizer::vectorize_tag_sets,
    Recommender,
};
use pawmatch_algo::models::{Pet, PetStatus};
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

fn tags(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|t| t.to_string()).collect()
}

fn create_pet(name: &str, pet_tags: &[&str]) -> Pet {
    Pet {
        id: Uuid::new_v4(),
        shelter_id: Uuid::new_v4(),
        name: name.to_string(),
        species: "dog".to_string(),
        age_months: Some(18),
        description: None,
        tags: tags(pet_tags),
        status: PetStatus::Available,
        created_at: None,
    }
}

#[test]
fn test_tag_parsing_accepts_every_legacy_encoding() {
    // JSON array, double-encoded array, comma-separated string
    assert_eq!(
        parse_tag_list(&json!(["calm", "senior"])),
        tags(&["calm", "senior"])
    );
    assert_eq!(
        parse_tag_list(&json!(r#"["calm", "senior"]"#)),
        tags(&["calm", "senior"])
    );
    assert_eq!(
        parse_tag_list(&json!("calm, senior")),
        tags(&["calm", "senior"])
    );
}

#[test]
fn test_malformed_tag_data_recovers_to_empty() {
    assert!(parse_tag_list(&json!(null)).is_empty());
    assert!(parse_tag_list(&json!(3.14)).is_empty());
    assert!(parse_tag_list(&json!({"tags": ["calm"]})).is_empty());
}

#[test]
fn test_preference_flattening_order() {
    let prefs = parse_tag_prefs(&json!({
        "size": ["small"],
        "energy": ["high"],
    }));

    // Categories sort, so energy precedes size
    assert_eq!(flatten_prefs(&prefs), tags(&["high", "small"]));
}

#[test]
fn test_invalid_weights_fall_back_to_default() {
    let weights = parse_tag_weights(&json!({
        "high": 2.0,
        "bogus": "not numeric",
        "negative": -1.0,
    }));

    assert_eq!(weights.len(), 1);
    assert_eq!(weights["high"], 2.0);
}

#[test]
fn test_vocabulary_is_the_sorted_union_of_all_inputs() {
    let query = tags(&["small", "high"]);
    let candidates = vec![tags(&["fluffy", "high"]), tags(&["small"])];

    let (vocab, _, _) = vectorize_tag_sets(&query, &candidates);

    assert_eq!(vocab.terms(), &["fluffy", "high", "small"]);
}

#[test]
fn test_tagless_adopter_and_pets_all_score_zero() {
    let query: Vec<String> = vec![];
    let candidates = vec![Vec::new(), Vec::new()];

    let (vocab, query_vec, candidate_vecs) = vectorize_tag_sets(&query, &candidates);
    let weights = weight_vector(&vocab, &HashMap::new(), 1.0);
    let scores = score_candidates(&query_vec, &candidate_vecs, &weights);

    assert!(scores.iter().all(|&s| s == 0.0));
}

#[test]
fn test_weighted_cosine_never_divides_by_zero() {
    assert_eq!(weighted_cosine(&[0.0], &[1.0], &[1.0]), 0.0);
    assert_eq!(weighted_cosine(&[1.0], &[0.0], &[1.0]), 0.0);
    assert_eq!(weighted_cosine(&[], &[], &[]), 0.0);
}

#[test]
fn test_scores_round_to_four_decimals_in_unit_interval() {
    assert_eq!(round_score(0.44721359), 0.4472);
    assert_eq!(round_score(1.0 + 1e-12), 1.0);
    assert_eq!(round_score(-1e-12), 0.0);
}

#[test]
fn test_worked_example_scores_and_order() {
    // Adopter {energy: [high], size: [small]}, weight high=2.0.
    // Pet A [high, small] -> 1.0; Pet B [small] -> 0.4472.
    let recommender = Recommender::with_default_weight();
    let candidates = vec![
        create_pet("A", &["high", "small"]),
        create_pet("B", &["small"]),
    ];
    let mut weights = HashMap::new();
    weights.insert("high".to_string(), 2.0);

    let result = recommender.rank(&tags(&["high", "small"]), &weights, candidates, 0);

    assert_eq!(result.recommendations[0].name, "A");
    assert_eq!(result.recommendations[0].score, 1.0);
    assert_eq!(result.recommendations[1].name, "B");
    assert_eq!(result.recommendations[1].score, 0.4472);
}

#[test]
fn test_limit_one_returns_only_the_top_pet() {
    let recommender = Recommender::with_default_weight();
    let candidates = vec![
        create_pet("A", &["high", "small"]),
        create_pet("B", &["small"]),
    ];
    let mut weights = HashMap::new();
    weights.insert("high".to_string(), 2.0);

    let result = recommender.rank(&tags(&["high", "small"]), &weights, candidates, 1);

    assert_eq!(result.recommendations.len(), 1);
    assert_eq!(result.recommendations[0].name, "A");
    assert_eq!(result.total_candidates, 2);
}

#[test]
fn test_weighted_monotonicity_over_increasing_weights() {
    // The candidate holding the weighted tag never drops below its twin
    // that lacks the tag, however far the weight is raised.
    let recommender = Recommender::with_default_weight();
    let query = tags(&["house-trained", "quiet"]);

    for raised in [0.5, 1.0, 3.0, 10.0, 100.0] {
        let candidates = vec![
            create_pet("with", &["house-trained", "quiet"]),
            create_pet("without", &["quiet"]),
        ];
        let mut weights = HashMap::new();
        weights.insert("house-trained".to_string(), raised);

        let result = recommender.rank(&query, &weights, candidates, 0);
        let with = result
            .recommendations
            .iter()
            .find(|r| r.name == "with")
            .unwrap();
        let without = result
            .recommendations
            .iter()
            .find(|r| r.name == "without")
            .unwrap();

        assert!(
            with.score >= without.score,
            "weight {} inverted the ordering",
            raised
        );
    }
}

#[test]
fn test_ranking_is_deterministic() {
    let recommender = Recommender::with_default_weight();
    let query = tags(&["calm", "small", "senior"]);
    let make_candidates = || {
        vec![
            create_pet("A", &["calm"]),
            create_pet("B", &["calm", "small"]),
            create_pet("C", &["senior", "small"]),
        ]
    };

    let first = recommender.rank(&query, &HashMap::new(), make_candidates(), 0);
    let second = recommender.rank(&query, &HashMap::new(), make_candidates(), 0);

    let first_scores: Vec<f64> = first.recommendations.iter().map(|r| r.score).collect();
    let second_scores: Vec<f64> = second.recommendations.iter().map(|r| r.score).collect();
    assert_eq!(first_scores, second_scores);
}
