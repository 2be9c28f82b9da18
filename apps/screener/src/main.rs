mod config;
mod embedding;
mod errors;
mod extract;
mod llm_client;
mod models;
mod routes;
mod screening;
mod state;
mod store;
mod ui;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::{CachedEmbedder, Embedder, HashingEmbedder, RemoteEmbedder};
use crate::llm_client::{LlmClient, LlmSettings};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::VectorStore;

const COLLECTION_NAME: &str = "resumes";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Screener v{}", env!("CARGO_PKG_VERSION"));

    // Initialize embedder (remote endpoint if configured, local hashing otherwise)
    let embedder = build_embedder(&config)?;
    info!(
        "Embedder initialized (model: {}, cache: {})",
        embedder.model_name(),
        config.embedding_cache_dir.display()
    );

    // Initialize vector store
    let store = VectorStore::open(&config.store_persist_dir, COLLECTION_NAME)?;

    // Initialize LLM client
    let llm = LlmClient::new(LlmSettings {
        api_url: config.completion_api_url.clone(),
        api_key: config.completion_api_key.clone(),
        model: config.completion_model.clone(),
        timeout: Duration::from_secs(config.completion_timeout_secs),
        max_retries: config.completion_max_retries,
    })?;
    if llm.has_api_key() {
        info!("LLM client initialized (model: {})", llm.model());
    } else {
        warn!("OPENROUTER_API_KEY is not set; summaries and questions will be placeholders");
    }

    let state = AppState {
        config: config.clone(),
        embedder,
        store: Arc::new(store),
        llm,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    let inner: Arc<dyn Embedder> = match &config.embedding_api_url {
        Some(url) => Arc::new(RemoteEmbedder::new(
            url.clone(),
            config.embedding_api_key.clone(),
            config.embedding_model.clone(),
        )?),
        None => Arc::new(HashingEmbedder::new(
            format!("feature-hashing-{}", config.embedding_dimensions),
            config.embedding_dimensions,
        )),
    };

    Ok(Arc::new(CachedEmbedder::new(
        inner,
        &config.embedding_cache_dir,
    )?))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
