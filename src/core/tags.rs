use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Weight applied to any tag the adopter has not weighted explicitly.
pub const DEFAULT_TAG_WEIGHT: f64 = 1.0;

/// Normalize a raw tag: trim surrounding whitespace, drop empties.
#[inline]
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a tag collection out of whatever shape the profile subsystem stored.
///
/// Accepted encodings, in order of preference:
/// - a JSON array of strings,
/// - a string containing a JSON array (legacy rows double-encode),
/// - a comma-separated string.
///
/// Anything else (null, numbers, objects) is treated as an empty collection —
/// malformed tag data is recovered locally, never surfaced as an error.
pub fn parse_tag_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().and_then(normalize_tag))
            .collect(),
        Value::String(text) => parse_tag_text(text),
        _ => Vec::new(),
    }
}

/// Parse tags from a bare string: JSON-array payloads first, then the
/// comma-separated fallback.
pub fn parse_tag_text(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) {
        return items
            .iter()
            .filter_map(|item| item.as_str().and_then(normalize_tag))
            .collect();
    }

    text.split(',').filter_map(normalize_tag).collect()
}

/// Parse an adopter's preference map: category -> one-or-many tag values.
///
/// Each category value may be a single string, a tag array, or any of the
/// encodings `parse_tag_list` accepts. Non-object payloads yield an empty map.
pub fn parse_tag_prefs(value: &Value) -> BTreeMap<String, Vec<String>> {
    let Value::Object(entries) = value else {
        return BTreeMap::new();
    };

    entries
        .iter()
        .filter_map(|(category, tags)| {
            let category = normalize_tag(category)?;
            let parsed = parse_tag_list(tags);
            if parsed.is_empty() {
                None
            } else {
                Some((category, parsed))
            }
        })
        .collect()
}

/// Flatten a preference map into the query tag collection fed to the
/// vectorizer: category order (sorted), then value order within a category.
pub fn flatten_prefs(prefs: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    prefs.values().flatten().cloned().collect()
}

/// Parse an adopter's per-tag weight map.
///
/// Values may be JSON numbers or numeric strings. Entries that are missing,
/// non-numeric, non-finite, or negative are dropped so the tag falls back to
/// [`DEFAULT_TAG_WEIGHT`]; a negative weight could push a similarity score
/// outside [0, 1].
pub fn parse_tag_weights(value: &Value) -> HashMap<String, f64> {
    let Value::Object(entries) = value else {
        return HashMap::new();
    };

    entries
        .iter()
        .filter_map(|(tag, weight)| {
            let tag = normalize_tag(tag)?;
            let weight = match weight {
                Value::Number(n) => n.as_f64()?,
                Value::String(s) => s.trim().parse::<f64>().ok()?,
                _ => return None,
            };
            if weight.is_finite() && weight >= 0.0 {
                Some((tag, weight))
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json_array() {
        let tags = parse_tag_list(&json!(["high-energy", " small ", ""]));
        assert_eq!(tags, vec!["high-energy", "small"]);
    }

    #[test]
    fn test_parse_double_encoded_array() {
        let tags = parse_tag_list(&json!(r#"["calm", "senior"]"#));
        assert_eq!(tags, vec!["calm", "senior"]);
    }

    #[test]
    fn test_parse_comma_separated() {
        let tags = parse_tag_list(&json!("calm, senior , ,house-trained"));
        assert_eq!(tags, vec!["calm", "senior", "house-trained"]);
    }

    #[test]
    fn test_malformed_payloads_become_empty() {
        assert!(parse_tag_list(&Value::Null).is_empty());
        assert!(parse_tag_list(&json!(42)).is_empty());
        assert!(parse_tag_list(&json!({"not": "a list"})).is_empty());
        assert!(parse_tag_list(&json!("")).is_empty());
    }

    #[test]
    fn test_non_string_array_items_skipped() {
        let tags = parse_tag_list(&json!(["calm", 7, null, "playful"]));
        assert_eq!(tags, vec!["calm", "playful"]);
    }

    #[test]
    fn test_parse_prefs_mixed_shapes() {
        let prefs = parse_tag_prefs(&json!({
            "energy": ["high"],
            "size": "small",
            "coat": [],
        }));

        assert_eq!(prefs.len(), 2);
        assert_eq!(prefs["energy"], vec!["high"]);
        assert_eq!(prefs["size"], vec!["small"]);
    }

    #[test]
    fn test_flatten_prefs_category_then_value_order() {
        let prefs = parse_tag_prefs(&json!({
            "size": ["small", "medium"],
            "energy": ["high"],
        }));

        // BTreeMap sorts categories: energy before size.
        assert_eq!(flatten_prefs(&prefs), vec!["high", "small", "medium"]);
    }

    #[test]
    fn test_parse_weights() {
        let weights = parse_tag_weights(&json!({
            "high": 2.0,
            "small": "1.5",
            "bad": "not-a-number",
            "negative": -3.0,
            "inf": f64::INFINITY,
        }));

        assert_eq!(weights.len(), 2);
        assert_eq!(weights["high"], 2.0);
        assert_eq!(weights["small"], 1.5);
    }

    #[test]
    fn test_parse_weights_non_object() {
        assert!(parse_tag_weights(&Value::Null).is_empty());
        assert!(parse_tag_weights(&json!([1.0, 2.0])).is_empty());
    }
}
