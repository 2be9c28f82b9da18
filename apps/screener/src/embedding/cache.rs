use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::{Embedder, EmbeddingError};

/// On-disk memoisation of embeddings: one JSON float array per distinct text,
/// named by the SHA-256 of the text. Entries are never evicted.
pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    dir: PathBuf,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn Embedder>, dir: impl Into<PathBuf>) -> Result<Self, EmbeddingError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { inner, dir })
    }

    pub fn cache_key(text: &str) -> String {
        format!("{:x}", Sha256::digest(text.as_bytes()))
    }

    fn cache_path(&self, text: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::cache_key(text)))
    }

    async fn read_cached(path: &Path) -> Option<Vec<f32>> {
        let raw = tokio::fs::read_to_string(path).await.ok()?;
        match serde_json::from_str::<Vec<f32>>(&raw) {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!("Ignoring unreadable cache file {}: {e}", path.display());
                None
            }
        }
    }

    /// Writes through a temp file in the cache dir so readers never see a partial array.
    fn write_cached(&self, path: &Path, vector: &[f32]) -> Result<(), EmbeddingError> {
        let json = serde_json::to_vec(vector).map_err(std::io::Error::from)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&json)?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[async_trait]
impl Embedder for CachedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let path = self.cache_path(text);
        if let Some(vector) = Self::read_cached(&path).await {
            debug!("Embedding cache hit: {}", path.display());
            return Ok(vector);
        }

        let vector = self.inner.embed(text).await?;
        if let Err(e) = self.write_cached(&path, &vector) {
            warn!("Failed to persist embedding cache {}: {e}", path.display());
        }
        Ok(vector)
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
