//! Embedding generation behind a pluggable trait.
//!
//! `AppState` carries an `Arc<dyn Embedder>`; at startup it is a `CachedEmbedder`
//! wrapping either the remote endpoint or the local hashing backend.

pub mod cache;
pub mod hashing;
pub mod remote;

use async_trait::async_trait;
use thiserror::Error;

pub use cache::CachedEmbedder;
pub use hashing::HashingEmbedder;
pub use remote::RemoteEmbedder;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding response contained no vector")]
    EmptyResponse,

    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns a fixed-length vector for `text`.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn model_name(&self) -> &str;
}
