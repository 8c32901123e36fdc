use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{agent::AgentClient, catalog::CatalogClient, recommendations::RecommendationPipeline},
};

pub mod chat;
pub mod movies;

/// Shared application state
pub struct AppState {
    pub catalog: Arc<dyn CatalogClient>,
    pub pipeline: RecommendationPipeline,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogClient>, agent: Arc<dyn AgentClient>) -> Self {
        Self {
            pipeline: RecommendationPipeline::new(agent, Arc::clone(&catalog)),
            catalog,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(chat::chat))
        .route("/movies/search", get(movies::search))
        .route("/movies/trending", get(movies::trending))
        .route("/movies/discover", get(movies::discover))
        .route("/movies/genres", get(movies::genres))
        .route("/movies/lists/:list", get(movies::list))
        .route("/movies/:id", get(movies::details))
        .route("/movies/:id/similar", get(movies::similar))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
