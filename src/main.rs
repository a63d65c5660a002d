use grammar_story::{AppState, Config, JsonFileStore, PersistedStore, gemini::GeminiClient, router};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    if config.gemini.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; AI features will report errors");
    }

    let store = PersistedStore::new(Arc::new(JsonFileStore::open(config.data_path.clone()).await));
    let generator = Arc::new(GeminiClient::new(config.gemini.clone()));
    let app = router(AppState::new(store, generator));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(data = %config.data_path.display(), model = %config.gemini.model, "listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
