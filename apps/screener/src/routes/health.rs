use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, and the size of the candidate index.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-screener",
        "embedding_model": state.embedder.model_name(),
        "completion_model": state.llm.model(),
        "completion_configured": state.llm.has_api_key(),
        "indexed_candidates": state.store.count().await
    }))
}
