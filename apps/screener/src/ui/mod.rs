//! Single-page UI: a form for the job description and resume uploads, and a
//! results page rendering every ranked candidate.

pub mod render;

use axum::{
    extract::{Multipart, State},
    response::Html,
};
use tracing::info;

use crate::errors::AppError;
use crate::screening::process_matching;
use crate::screening::upload::{parse_uploads, read_screening_form, IncompleteForm};
use crate::state::AppState;
use render::{render_form_page, render_results_page, FormValues};

/// GET /
pub async fn handle_index() -> Html<String> {
    Html(render_form_page(&FormValues::default(), None))
}

/// POST /screen
///
/// Validation problems re-render the form with a warning. Per-file parse failures
/// are listed above the results and do not stop the run.
pub async fn handle_screen(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let form = match read_screening_form(multipart).await {
        Ok(form) => form,
        Err(IncompleteForm {
            form,
            error: AppError::Validation(msg),
        }) => {
            let values = FormValues {
                job_description: &form.job_description,
                top_k: Some(form.top_k),
            };
            return Ok(Html(render_form_page(&values, Some(&msg))));
        }
        Err(incomplete) => return Err(incomplete.into()),
    };

    let values = FormValues {
        job_description: &form.job_description,
        top_k: Some(form.top_k),
    };

    if let Err(e) = form.validate() {
        let msg = match e {
            AppError::Validation(msg) => msg,
            other => return Err(other),
        };
        return Ok(Html(render_form_page(&values, Some(&msg))));
    }

    let (resumes, failures) = parse_uploads(&form.files).await;
    info!(
        "UI screening: {} parsed, {} failed",
        resumes.len(),
        failures.len()
    );

    let results = process_matching(&state, &resumes, &form.job_description, form.top_k).await?;
    let errors: Vec<String> = failures.iter().map(|f| f.message()).collect();

    Ok(Html(render_results_page(&values, &errors, &results)))
}
