use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;

use super::{CatalogId, MovieRecord};

/// A movie suggested by the agent, not yet verified against the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationCandidate {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub catalog_id: Option<CatalogId>,
}

/// Outcome of one chat pipeline run
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResult {
    /// Catalog records for the recommendations that resolved, in agent order
    Recommendations(Vec<MovieRecord>),
    /// Valid JSON that is not a recommendation payload, forwarded as-is
    StructuredPayload(Value),
    /// Ordinary conversational reply
    FreeText(String),
}

/// Where a similar-movies list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarSource {
    /// Agent suggestions resolved against the catalog
    Agent,
    /// Catalog's popular listing, used when no suggestion resolved
    Popular,
}

/// Movies similar to a given title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarMovies {
    pub source: SimilarSource,
    pub recommendations: Vec<MovieRecord>,
}

impl PipelineResult {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineResult::Recommendations(_) => "recommendations",
            PipelineResult::StructuredPayload(_) => "structured",
            PipelineResult::FreeText(_) => "free_text",
        }
    }
}

impl Serialize for PipelineResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PipelineResult::Recommendations(movies) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("recommendations", movies)?;
                map.end()
            }
            PipelineResult::StructuredPayload(value) => value.serialize(serializer),
            PipelineResult::FreeText(text) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("response", text)?;
                map.end()
            }
        }
    }
}
