use chrono::Utc;
use tracing::{info, warn};

use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::models::resume::{truncate_chars, ResumeRecord};
use crate::store::{QueryHit, StoreEntry, StoreError, VectorStore};

/// Characters of resume text that are embedded and kept as the stored document.
pub const STORE_TEXT_CHARS: usize = 2000;

/// Embeds every resume and upserts it into the index under its file name.
///
/// On an id conflict every id of the batch is deleted and the add is retried once,
/// so a re-uploaded file replaces its previous entry. A file name repeated within
/// the batch keeps only its last occurrence.
pub async fn add_resumes_to_store(
    embedder: &dyn Embedder,
    store: &VectorStore,
    resumes: &[ResumeRecord],
) -> Result<(), AppError> {
    let unique = last_per_file_name(resumes);

    let mut batch = Vec::with_capacity(unique.len());
    for resume in unique {
        let document = truncate_chars(&resume.text, STORE_TEXT_CHARS).to_string();
        let embedding = embedder.embed(&document).await?;
        batch.push(StoreEntry {
            id: resume.file_name.clone(),
            embedding,
            metadata: resume.contact(),
            document,
            added_at: Utc::now(),
        });
    }

    if batch.is_empty() {
        return Ok(());
    }

    let batch_len = batch.len();
    match store.add(batch.clone()).await {
        Ok(()) => {}
        Err(StoreError::DuplicateId(id)) => {
            warn!("Collection '{}' already holds '{id}', replacing batch", store.name());
            let ids: Vec<String> = batch.iter().map(|e| e.id.clone()).collect();
            store.delete(&ids).await?;
            store.add(batch).await?;
        }
        Err(e) => return Err(e.into()),
    }

    info!(
        "Indexed {} resume(s) into '{}' ({} total)",
        batch_len,
        store.name(),
        store.count().await
    );
    Ok(())
}

fn last_per_file_name(resumes: &[ResumeRecord]) -> Vec<&ResumeRecord> {
    let mut unique: Vec<&ResumeRecord> = Vec::with_capacity(resumes.len());
    for resume in resumes {
        if let Some(pos) = unique.iter().position(|r| r.file_name == resume.file_name) {
            warn!("'{}' uploaded more than once, keeping the last copy", resume.file_name);
            unique.remove(pos);
        }
        unique.push(resume);
    }
    unique
}

/// Embeds the job description and returns the `top_k` nearest candidates.
pub async fn query(
    embedder: &dyn Embedder,
    store: &VectorStore,
    job_description: &str,
    top_k: usize,
) -> Result<Vec<QueryHit>, AppError> {
    let embedding = embedder.embed(job_description).await?;
    Ok(store.query(&embedding, top_k).await?)
}
