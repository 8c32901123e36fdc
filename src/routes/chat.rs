use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{ChatTurn, PipelineResult},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Handler for the conversational recommendation endpoint
///
/// Responds with `{"recommendations": [...]}`, the agent's own JSON, or
/// `{"response": "..."}` depending on what the agent said.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<PipelineResult>> {
    tracing::info!(
        request_id = %request_id,
        history_len = request.history.len(),
        "Processing chat request"
    );

    let prompt = request.prompt.unwrap_or_default();
    let result = state.pipeline.run(request.history, &prompt).await?;

    tracing::info!(
        request_id = %request_id,
        result = result.kind(),
        "Chat request completed"
    );

    Ok(Json(result))
}
