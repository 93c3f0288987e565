use std::collections::{BTreeSet, HashMap};

/// Feature vocabulary shared by one vectorization pass.
///
/// Holds the distinct tags seen across the query collection and every
/// candidate collection, in lexicographic order. The vocabulary is rebuilt
/// from scratch on every recommendation call — it is a pure function of the
/// inputs, never a persisted catalog, so feature positions are only
/// meaningful within a single pass.
#[derive(Debug, Clone)]
pub struct TagVocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl TagVocabulary {
    /// Build the vocabulary from every tag collection in the pass.
    pub fn build<'a, I>(collections: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let distinct: BTreeSet<&str> = collections
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();

        let terms: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        Self { terms, index }
    }

    /// Number of features in the vocabulary.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Feature position of a tag, if it occurs in this pass.
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.index.get(tag).copied()
    }

    /// The ordered feature terms.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Encode a tag collection as a multi-hot vector over this vocabulary:
    /// 1.0 where the tag is present, 0.0 otherwise. Duplicate tags collapse;
    /// an empty collection encodes to the all-zero vector.
    pub fn encode(&self, tags: &[String]) -> Vec<f64> {
        let mut vector = vec![0.0; self.terms.len()];
        for tag in tags {
            if let Some(i) = self.position(tag) {
                vector[i] = 1.0;
            }
        }
        vector
    }
}

/// Vectorize one query collection against a list of candidate collections.
///
/// Returns the shared vocabulary, the query vector, and one vector per
/// candidate in input order.
pub fn vectorize_tag_sets(
    query: &[String],
    candidates: &[Vec<String>],
) -> (TagVocabulary, Vec<f64>, Vec<Vec<f64>>) {
    let vocabulary = TagVocabulary::build(
        std::iter::once(query).chain(candidates.iter().map(Vec::as_slice)),
    );

    let query_vector = vocabulary.encode(query);
    let candidate_vectors = candidates
        .iter()
        .map(|tags| vocabulary.encode(tags))
        .collect();

    (vocabulary, query_vector, candidate_vectors)
}
