//! Axum route handlers for the Screening JSON API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::parse_resume;
use crate::models::resume::{ContactMetadata, MatchResult, ResumeRecord};
use crate::screening::process_matching;
use crate::screening::upload::{parse_uploads, read_screening_form, ParseFailure};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub run_id: Uuid,
    /// Ranked by ascending `score` (cosine distance).
    pub results: Vec<MatchResult>,
    pub parse_errors: Vec<ParseFailure>,
}

#[derive(Debug, Serialize)]
pub struct CandidateDetailResponse {
    pub id: String,
    pub metadata: ContactMetadata,
    pub document: String,
    pub dimensions: usize,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub collection: String,
    pub count: usize,
    pub ids: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings
///
/// Multipart: `job_description`, optional `top_k`, one or more file parts.
/// Files that fail to parse are listed in `parse_errors`; the rest are screened.
pub async fn handle_screening(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let form = read_screening_form(multipart).await?;
    form.validate()?;

    let run_id = Uuid::new_v4();
    info!(%run_id, files = form.files.len(), top_k = form.top_k, "Screening run started");

    let (resumes, parse_errors) = parse_uploads(&form.files).await;
    let results = process_matching(&state, &resumes, &form.job_description, form.top_k).await?;

    Ok(Json(ScreeningResponse {
        run_id,
        results,
        parse_errors,
    }))
}

/// POST /api/v1/resumes/parse
///
/// Extracts text and contact details from the first uploaded file without indexing it.
pub async fn handle_parse_resume(multipart: Multipart) -> Result<Json<ResumeRecord>, AppError> {
    let form = read_screening_form(multipart).await?;
    let file = form
        .files
        .first()
        .ok_or_else(|| AppError::Validation("Please upload a resume file.".to_string()))?;

    let record = parse_resume(&file.file_name, &file.data).await?;
    Ok(Json(record))
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Json<CandidateListResponse> {
    let ids = state.store.list_ids().await;
    Json(CandidateListResponse {
        collection: state.store.name().to_string(),
        count: ids.len(),
        ids,
    })
}

/// GET /api/v1/candidates/:id
///
/// Stored document and contact metadata; the raw embedding is not returned.
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CandidateDetailResponse>, AppError> {
    let entry = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;

    Ok(Json(CandidateDetailResponse {
        dimensions: entry.embedding.len(),
        id: entry.id,
        metadata: entry.metadata,
        document: entry.document,
        added_at: entry.added_at,
    }))
}

/// DELETE /api/v1/candidates/:id
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = state.store.delete(std::slice::from_ref(&id)).await?;
    if removed == 0 {
        return Err(AppError::NotFound(format!("Candidate {id} not found")));
    }
    info!("Removed candidate '{id}' from '{}'", state.store.name());
    Ok(StatusCode::NO_CONTENT)
}
