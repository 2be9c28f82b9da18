use std::sync::Arc;

use crate::config::Config;
use crate::embedding::Embedder;
use crate::llm_client::LlmClient;
use crate::store::VectorStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every client is built once in `main` and torn down when the server exits.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Cache-wrapped embedder. Backend chosen by `EMBEDDING_API_URL`.
    pub embedder: Arc<dyn Embedder>,
    pub store: Arc<VectorStore>,
    pub llm: LlmClient,
}
