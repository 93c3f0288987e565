// Core algorithm exports
pub mod ranker;
pub mod scoring;
pub mod tags;
pub mod vectorizer;

pub use ranker::{RankedOutcome, Recommender};
pub use scoring::{score_candidates, weight_vector, weighted_cosine};
pub use tags::{flatten_prefs, parse_tag_list, parse_tag_prefs, parse_tag_weights};
pub use vectorizer::{vectorize_tag_sets, TagVocabulary};
