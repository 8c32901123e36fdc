//! Chat recommendation pipeline
//!
//! Agent reply → [`extractor`] → (recommendations only) [`enricher`] → result.
//! Failures along the way degrade into one of the [`PipelineResult`]
//! variants; only an empty prompt is reported as an error.
//!
//! [`PipelineResult`]: crate::models::PipelineResult

pub mod enricher;
pub mod extractor;
pub mod pipeline;

pub use enricher::RecommendationEnricher;
pub use extractor::{extract, Extraction};
pub use pipeline::RecommendationPipeline;
