use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::models::{CatalogId, RecommendationCandidate};

/// Key holding the recommendation array in the agent's payload
pub const RECOMMENDATIONS_KEY: &str = "recommendations";

/// First ```json fence; captures from its first `{` to the `}` that closes the fence.
static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("JSON fence pattern is valid")
});

/// What an agent reply turned out to contain
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// A recommendation payload, one candidate per array entry
    Candidates(Vec<RecommendationCandidate>),
    /// Some other JSON value
    Structured(Value),
    /// Not JSON: the reply exactly as received
    FreeText(String),
}

/// JSON object inside the first ```json fence of `raw`, if there is one
pub fn fenced_json(raw: &str) -> Option<&str> {
    JSON_FENCE
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Classifies a raw agent reply.
///
/// Fenced JSON wins over the surrounding prose. Without a usable fence the
/// whole reply is parsed. Anything that does not parse is conversation and
/// comes back untouched, never the cleaned-up fence contents.
pub fn extract(raw: &str) -> Extraction {
    let json_text = fenced_json(raw).unwrap_or(raw);

    let parsed: Value = match serde_json::from_str(json_text) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Agent reply is not JSON, treating as conversation");
            return Extraction::FreeText(raw.to_string());
        }
    };

    match parsed.get(RECOMMENDATIONS_KEY).and_then(Value::as_array) {
        Some(entries) => {
            let candidates: Vec<RecommendationCandidate> =
                entries.iter().map(candidate_from_entry).collect();

            tracing::debug!(candidates = candidates.len(), "Recommendation payload extracted");
            Extraction::Candidates(candidates)
        }
        None => Extraction::Structured(parsed),
    }
}

/// Maps one array entry to a candidate. Unusable fields become `None`; the
/// entry itself is never rejected here.
fn candidate_from_entry(entry: &Value) -> RecommendationCandidate {
    let catalog_id = entry
        .get("tmdb_id")
        .and_then(CatalogId::from_json)
        .or_else(|| entry.get("catalog_id").and_then(CatalogId::from_json));

    RecommendationCandidate {
        title: entry.get("title").and_then(Value::as_str).map(str::to_string),
        year: entry.get("year").and_then(parse_year),
        catalog_id,
    }
}

fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidates(extraction: Extraction) -> Vec<RecommendationCandidate> {
        match extraction {
            Extraction::Candidates(candidates) => candidates,
            other => panic!("expected candidates, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_text_is_free_text() {
        assert_eq!(extract("Hi there!"), Extraction::FreeText("Hi there!".to_string()));
    }

    #[test]
    fn test_free_text_reclassifies_the_same() {
        let Extraction::FreeText(text) = extract("What genre are you in the mood for?") else {
            panic!("expected free text");
        };
        assert_eq!(extract(&text), Extraction::FreeText(text.clone()));
    }

    #[test]
    fn test_fenced_payload_ignores_surrounding_prose() {
        let raw = "Here you go:\n```json\n{\"recommendations\":[{\"title\":\"Dune\",\"year\":2021,\"catalog_id\":438631}]}\n```\nEnjoy the spice!";
        let candidates = candidates(extract(raw));

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].catalog_id, Some(CatalogId::from(438631)));
        assert_eq!(candidates[0].title.as_deref(), Some("Dune"));
        assert_eq!(candidates[0].year, Some(2021));
    }

    #[test]
    fn test_pretty_printed_fence() {
        let raw = r#"```json

  {
    "recommendations": [
      { "title": "Blade Runner 2049", "year": 2017, "tmdb_id": 335984 },
      { "title": "Ex Machina", "year": 2014, "tmdb_id": 264660 }
    ]
  }

```"#;
        let candidates = candidates(extract(raw));
        let ids: Vec<_> = candidates
            .iter()
            .map(|c| c.catalog_id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec![CatalogId::from(335984), CatalogId::from(264660)]);
    }

    #[test]
    fn test_only_first_fence_is_used() {
        let raw = "```json\n{\"recommendations\":[{\"tmdb_id\":1}]}\n```\nand also\n```json\n{\"recommendations\":[{\"tmdb_id\":2},{\"tmdb_id\":3}]}\n```";
        let candidates = candidates(extract(raw));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].catalog_id, Some(CatalogId::from(1)));
    }

    #[test]
    fn test_fence_marker_is_case_sensitive() {
        let raw = "```JSON\n{\"status\":\"ok\"}\n```";
        assert_eq!(fenced_json(raw), None);
        assert_eq!(extract(raw), Extraction::FreeText(raw.to_string()));
    }

    #[test]
    fn test_unclosed_fence_falls_back_to_whole_reply() {
        let raw = "```json\n{\"recommendations\": [";
        assert_eq!(fenced_json(raw), None);
        assert_eq!(extract(raw), Extraction::FreeText(raw.to_string()));
    }

    #[test]
    fn test_bad_json_in_fence_returns_original_reply() {
        let raw = "Sure!\n```json\n{recommendations: oops}\n```";
        assert_eq!(extract(raw), Extraction::FreeText(raw.to_string()));
    }

    #[test]
    fn test_raw_json_without_fence() {
        let raw = r#"{"recommendations":[{"title":"Arrival","year":2016,"tmdb_id":329865}]}"#;
        let candidates = candidates(extract(raw));
        assert_eq!(candidates[0].catalog_id, Some(CatalogId::from(329865)));
    }

    #[test]
    fn test_other_json_is_structured_payload() {
        assert_eq!(
            extract(r#"{"status":"ok"}"#),
            Extraction::Structured(json!({"status": "ok"}))
        );
    }

    #[test]
    fn test_non_array_recommendations_is_structured_payload() {
        assert_eq!(
            extract(r#"{"recommendations":"coming soon"}"#),
            Extraction::Structured(json!({"recommendations": "coming soon"}))
        );
    }

    #[test]
    fn test_empty_recommendation_array() {
        assert_eq!(
            extract(r#"{"recommendations":[]}"#),
            Extraction::Candidates(vec![])
        );
    }

    #[test]
    fn test_entries_without_id_are_kept() {
        let raw = r#"{"recommendations":[{"title":"Dune","year":"2021"},{"tmdb_id":"438631"},42]}"#;
        let candidates = candidates(extract(raw));

        assert_eq!(candidates.len(), 3);
        assert_eq!(
            candidates[0],
            RecommendationCandidate {
                title: Some("Dune".to_string()),
                year: Some(2021),
                catalog_id: None,
            }
        );
        assert_eq!(candidates[1].catalog_id, Some(CatalogId::from(438631)));
        assert_eq!(candidates[1].title, None);
        assert_eq!(candidates[2], RecommendationCandidate::default());
    }

    #[test]
    fn test_path_like_ids_are_not_ids() {
        let raw = r#"{"recommendations":[{"title":"Game of Thrones","tmdb_id":"../tv/1399"},{"tmdb_id":"1399"}]}"#;
        let candidates = candidates(extract(raw));

        assert_eq!(candidates[0].title.as_deref(), Some("Game of Thrones"));
        assert_eq!(candidates[0].catalog_id, None);
        assert_eq!(candidates[1].catalog_id, Some(CatalogId::from(1399)));
    }

    #[test]
    fn test_null_tmdb_id_uses_catalog_id() {
        let raw = r#"{"recommendations":[{"tmdb_id":null,"catalog_id":7}]}"#;
        let candidates = candidates(extract(raw));
        assert_eq!(candidates[0].catalog_id, Some(CatalogId::from(7)));
    }
}
