//! Persistent candidate index with exact cosine-distance search.
//!
//! One named collection per store, held in memory and snapshotted to
//! `<dir>/<name>.json` after every mutation. Snapshot writes go through a temp
//! file and rename, so a crash leaves either the old or the new snapshot.

pub mod distance;
pub mod resumes;

use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::resume::ContactMetadata;
use distance::cosine_distance;

pub use resumes::{add_resumes_to_store, query};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ID already exists in collection: {0}")]
    DuplicateId(String),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Snapshot is corrupt: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One candidate in the index, keyed by the uploaded file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreEntry {
    pub id: String,
    pub embedding: Vec<f32>,
    pub metadata: ContactMetadata,
    /// Truncated resume text the embedding was computed from.
    pub document: String,
    pub added_at: DateTime<Utc>,
}

/// A nearest-neighbour result. `distance` is cosine distance, lower is closer.
#[derive(Debug, Clone, Serialize)]
pub struct QueryHit {
    pub id: String,
    pub distance: f32,
    pub document: String,
    pub metadata: ContactMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    name: String,
    metric: String,
    entries: Vec<StoreEntry>,
}

pub struct VectorStore {
    name: String,
    path: PathBuf,
    entries: RwLock<BTreeMap<String, StoreEntry>>,
}

impl VectorStore {
    /// Opens the collection `name` under `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>, name: &str) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{name}.json"));

        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let snapshot: Snapshot = serde_json::from_str(&raw)
                .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?;
            snapshot
                .entries
                .into_iter()
                .map(|e| (e.id.clone(), e))
                .collect()
        } else {
            BTreeMap::new()
        };

        info!(
            "Opened vector collection '{name}' at {} ({} entries)",
            path.display(),
            entries.len()
        );

        Ok(Self {
            name: name.to_string(),
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts every entry or none. Fails on an id that already exists or repeats in the batch.
    pub async fn add(&self, batch: Vec<StoreEntry>) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;

        {
            let mut seen = HashSet::new();
            for entry in &batch {
                if entries.contains_key(&entry.id) || !seen.insert(entry.id.as_str()) {
                    return Err(StoreError::DuplicateId(entry.id.clone()));
                }
            }
        }

        let mut expected = entries.values().next().map(|e| e.embedding.len());
        for entry in &batch {
            match expected {
                Some(dim) if dim != entry.embedding.len() => {
                    return Err(StoreError::DimensionMismatch {
                        expected: dim,
                        actual: entry.embedding.len(),
                    });
                }
                None => expected = Some(entry.embedding.len()),
                _ => {}
            }
        }

        let mut next = entries.clone();
        for entry in batch {
            next.insert(entry.id.clone(), entry);
        }
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    /// Removes the given ids, ignoring unknown ones. Returns how many were removed.
    pub async fn delete(&self, ids: &[String]) -> Result<usize, StoreError> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        let removed = ids.iter().filter(|id| next.remove(*id).is_some()).count();
        if removed > 0 {
            self.persist(&next).await?;
            *entries = next;
        }
        Ok(removed)
    }

    /// Returns up to `n_results` entries ordered by ascending cosine distance.
    pub async fn query(
        &self,
        embedding: &[f32],
        n_results: usize,
    ) -> Result<Vec<QueryHit>, StoreError> {
        let entries = self.entries.read().await;

        if let Some(first) = entries.values().next() {
            if first.embedding.len() != embedding.len() {
                return Err(StoreError::DimensionMismatch {
                    expected: first.embedding.len(),
                    actual: embedding.len(),
                });
            }
        }

        let mut scored: Vec<(f32, &StoreEntry)> = entries
            .values()
            .map(|e| (cosine_distance(embedding, &e.embedding), e))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));

        Ok(scored
            .into_iter()
            .take(n_results)
            .map(|(distance, e)| QueryHit {
                id: e.id.clone(),
                distance,
                document: e.document.clone(),
                metadata: e.metadata.clone(),
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> Option<StoreEntry> {
        self.entries.read().await.get(id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn list_ids(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }

    async fn persist(&self, entries: &BTreeMap<String, StoreEntry>) -> Result<(), StoreError> {
        let snapshot = Snapshot {
            name: self.name.clone(),
            metric: "cosine".to_string(),
            entries: entries.values().cloned().collect(),
        };
        let bytes = serde_json::to_vec(&snapshot).map_err(std::io::Error::from)?;

        // Runs while the caller holds the write guard, so snapshots land in order.
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_snapshot(&path, &bytes))
            .await
            .map_err(std::io::Error::other)??;
        Ok(())
    }
}

fn write_snapshot(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
