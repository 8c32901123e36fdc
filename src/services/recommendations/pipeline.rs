use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{ChatTurn, MovieList, MovieRecord, PipelineResult, SimilarMovies, SimilarSource},
    services::{agent::AgentClient, catalog::CatalogClient},
};

use super::{extractor, Extraction, RecommendationEnricher};

/// Most movies returned by a similar-title request
pub const SIMILAR_LIMIT: usize = 5;

/// Agent → extractor → enricher, for one chat message
#[derive(Clone)]
pub struct RecommendationPipeline {
    agent: Arc<dyn AgentClient>,
    catalog: Arc<dyn CatalogClient>,
    enricher: RecommendationEnricher,
}

impl RecommendationPipeline {
    pub fn new(agent: Arc<dyn AgentClient>, catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            agent,
            enricher: RecommendationEnricher::new(Arc::clone(&catalog)),
            catalog,
        }
    }

    /// Answers `prompt` in the context of `history`.
    ///
    /// The only error is `InvalidInput` for an empty prompt, raised before the
    /// agent is called. Agent outages arrive here as the fallback reply and
    /// flow through like any other text.
    pub async fn run(&self, history: Vec<ChatTurn>, prompt: &str) -> AppResult<PipelineResult> {
        if prompt.is_empty() {
            return Err(AppError::InvalidInput("Prompt is required.".to_string()));
        }

        let reply = self.agent.respond(&history, prompt).await;

        let result = match extractor::extract(&reply) {
            Extraction::Candidates(candidates) => {
                PipelineResult::Recommendations(self.enricher.enrich(candidates).await)
            }
            Extraction::Structured(value) => PipelineResult::StructuredPayload(value),
            Extraction::FreeText(text) => PipelineResult::FreeText(text),
        };

        tracing::info!(
            history_len = history.len(),
            result = result.kind(),
            "Chat pipeline completed"
        );

        Ok(result)
    }

    /// Up to [`SIMILAR_LIMIT`] movies like `title`, asked of the agent
    /// without history.
    ///
    /// Only the first [`SIMILAR_LIMIT`] suggestions are looked up. When none
    /// of them resolve (or the agent does not answer with a payload at all)
    /// the top of the popular listing is returned instead.
    pub async fn similar_to(&self, title: &str) -> AppResult<SimilarMovies> {
        if title.is_empty() {
            return Err(AppError::InvalidInput("Title is required.".to_string()));
        }

        let prompt = format!(
            "Based on the movie '{}', suggest {} similar movies. You must respond with only a JSON object.",
            title, SIMILAR_LIMIT
        );
        let reply = self.agent.respond(&[], &prompt).await;

        let recommendations = match extractor::extract(&reply) {
            Extraction::Candidates(mut candidates) => {
                candidates.truncate(SIMILAR_LIMIT);
                self.enricher.enrich(candidates).await
            }
            other => {
                tracing::debug!(
                    title = %title,
                    reply = ?other,
                    "Agent gave no recommendation payload for similar movies"
                );
                Vec::new()
            }
        };

        if !recommendations.is_empty() {
            tracing::info!(
                title = %title,
                count = recommendations.len(),
                "Similar movies resolved"
            );
            return Ok(SimilarMovies {
                source: SimilarSource::Agent,
                recommendations,
            });
        }

        tracing::info!(title = %title, "Falling back to popular movies");
        Ok(SimilarMovies {
            source: SimilarSource::Popular,
            recommendations: self.popular_fallback().await,
        })
    }

    async fn popular_fallback(&self) -> Vec<MovieRecord> {
        match self.catalog.movie_list(MovieList::Popular, 1).await {
            Ok(page) => page.results.into_iter().take(SIMILAR_LIMIT).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Popular fallback unavailable");
                Vec::new()
            }
        }
    }
}
