use std::sync::Arc;

use mirai_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{agent::GeminiClient, catalog::TmdbClient},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mirai_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = TmdbClient::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.catalog_timeout(),
    )?;
    let agent = GeminiClient::new(
        config.google_ai_api_key.clone(),
        config.google_ai_api_url.clone(),
        config.google_ai_model.clone(),
        config.agent_timeout(),
    )?;

    tracing::info!(
        catalog_url = %config.tmdb_api_url,
        model = %config.google_ai_model,
        "Clients configured"
    );

    let state = Arc::new(AppState::new(Arc::new(catalog), Arc::new(agent)));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
