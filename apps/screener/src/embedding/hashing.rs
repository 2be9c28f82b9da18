use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::{Embedder, EmbeddingError};

/// Local feature-hashing embedder.
///
/// Each lowercased alphanumeric token is hashed into one of `dimensions` buckets
/// with a sign taken from the digest, then the vector is L2-normalised. Texts that
/// share vocabulary land close together under cosine distance. Used when no remote
/// embedding endpoint is configured.
pub struct HashingEmbedder {
    model: String,
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            model: model.into(),
            dimensions: dimensions.max(1),
        }
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let digest = Sha256::digest(token.to_lowercase().as_bytes());
            let mut head = [0u8; 8];
            head.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(head) % self.dimensions as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_sync(text))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
