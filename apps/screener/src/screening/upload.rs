use axum::extract::Multipart;
use bytes::Bytes;
use serde::Serialize;
use tracing::warn;

use crate::errors::AppError;
use crate::extract::parse_resume;
use crate::models::resume::ResumeRecord;

pub const DEFAULT_TOP_K: usize = 5;
pub const MAX_TOP_K: usize = 50;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// Fields of the screening form, as submitted by the UI or the JSON API.
#[derive(Debug, Clone)]
pub struct ScreeningForm {
    pub job_description: String,
    pub top_k: usize,
    pub files: Vec<UploadedFile>,
}

impl ScreeningForm {
    /// Same checks, same wording, for the UI warning and the API error.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "Please paste the job description.".to_string(),
            ));
        }
        if self.files.is_empty() {
            return Err(AppError::Validation(
                "Please upload at least one resume.".to_string(),
            ));
        }
        Ok(())
    }
}

/// A file that could not be turned into a `ResumeRecord`.
#[derive(Debug, Clone, Serialize)]
pub struct ParseFailure {
    pub file_name: String,
    pub error: String,
}

impl ParseFailure {
    pub fn message(&self) -> String {
        format!("Failed to parse {}: {}", self.file_name, self.error)
    }
}

/// A form that could not be read completely. `form` holds every field read
/// before or after the failing one, so the UI can re-render it.
#[derive(Debug)]
pub struct IncompleteForm {
    pub form: ScreeningForm,
    pub error: AppError,
}

impl From<IncompleteForm> for AppError {
    fn from(incomplete: IncompleteForm) -> Self {
        incomplete.error
    }
}

/// Reads `job_description`, `top_k` and every file part from a multipart body.
/// Unknown fields are ignored; empty file inputs (no name, no bytes) are skipped.
/// An invalid `top_k` is reported after the remaining fields have been read.
pub async fn read_screening_form(
    mut multipart: Multipart,
) -> Result<ScreeningForm, IncompleteForm> {
    let mut form = ScreeningForm {
        job_description: String::new(),
        top_k: DEFAULT_TOP_K,
        files: Vec::new(),
    };
    let mut error = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                error = Some(AppError::Validation(format!("Invalid multipart body: {e}")));
                break;
            }
        };
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        match (name.as_str(), file_name) {
            ("job_description", None) => match read_text(field).await {
                Ok(text) => form.job_description = text,
                Err(e) => {
                    error = Some(e);
                    break;
                }
            },
            ("top_k", None) => {
                let parsed = match read_text(field).await {
                    Ok(raw) => parse_top_k(&raw),
                    Err(e) => {
                        error = Some(e);
                        break;
                    }
                };
                match parsed {
                    Ok(k) => form.top_k = k,
                    Err(e) => {
                        error.get_or_insert(e);
                    }
                }
            }
            (_, Some(file_name)) => match field.bytes().await {
                Ok(data) if file_name.is_empty() && data.is_empty() => {}
                Ok(data) => form.files.push(UploadedFile { file_name, data }),
                Err(e) => {
                    error = Some(AppError::Validation(format!(
                        "Failed to read {file_name}: {e}"
                    )));
                    break;
                }
            },
            _ => {}
        }
    }

    match error {
        Some(error) => Err(IncompleteForm { form, error }),
        None => Ok(form),
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid form field: {e}")))
}

/// Blank means the default; anything else must be an integer in `1..=MAX_TOP_K`.
pub fn parse_top_k(raw: &str) -> Result<usize, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_TOP_K);
    }
    match raw.parse::<usize>() {
        Ok(k) if (1..=MAX_TOP_K).contains(&k) => Ok(k),
        _ => Err(AppError::Validation(format!(
            "top_k must be a whole number between 1 and {MAX_TOP_K}"
        ))),
    }
}

/// Parses every upload in order. A failing file is recorded and the batch continues.
pub async fn parse_uploads(files: &[UploadedFile]) -> (Vec<ResumeRecord>, Vec<ParseFailure>) {
    let mut resumes = Vec::with_capacity(files.len());
    let mut failures = Vec::new();

    for file in files {
        match parse_resume(&file.file_name, &file.data).await {
            Ok(record) => resumes.push(record),
            Err(e) => {
                warn!("Failed to parse {}: {e}", file.file_name);
                failures.push(ParseFailure {
                    file_name: file.file_name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    (resumes, failures)
}
