use std::sync::Arc;

use crate::{
    models::{MovieRecord, RecommendationCandidate},
    services::catalog::CatalogClient,
};

/// Resolves recommendation candidates into full catalog records
#[derive(Clone)]
pub struct RecommendationEnricher {
    catalog: Arc<dyn CatalogClient>,
}

impl RecommendationEnricher {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Looks up every candidate that carries a catalog id.
    ///
    /// Lookups run concurrently, one task per candidate, and are joined in
    /// candidate order, so the output order never depends on which lookup
    /// finishes first. Candidates without an id, ids the catalog does not
    /// know, and failed lookups are left out. Repeated ids yield repeated
    /// records.
    pub async fn enrich(&self, candidates: Vec<RecommendationCandidate>) -> Vec<MovieRecord> {
        let mut tasks = Vec::new();

        for candidate in candidates {
            let Some(catalog_id) = candidate.catalog_id else {
                tracing::debug!(
                    title = ?candidate.title,
                    "Skipping recommendation without catalog id"
                );
                continue;
            };

            let catalog = Arc::clone(&self.catalog);
            let lookup_id = catalog_id.clone();
            let task = tokio::spawn(async move { catalog.movie_details(&lookup_id).await });
            tasks.push((catalog_id, task));
        }

        let requested = tasks.len();
        let mut movies = Vec::with_capacity(requested);

        for (catalog_id, task) in tasks {
            match task.await {
                Ok(Some(record)) => movies.push(record),
                Ok(None) => {
                    tracing::debug!(catalog_id = %catalog_id, "Recommendation not in catalog, dropping");
                }
                Err(e) => {
                    tracing::error!(catalog_id = %catalog_id, error = %e, "Catalog lookup task failed");
                }
            }
        }

        if movies.len() < requested {
            tracing::warn!(
                requested = requested,
                resolved = movies.len(),
                "Partial recommendation enrichment"
            );
        }

        movies
    }
}
