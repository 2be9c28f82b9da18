use super::ExtractError;

/// Extracts the text layer of a PDF.
///
/// `pdf-extract` can panic on malformed input, so it runs on the blocking pool
/// where a panic surfaces as a join error instead of taking the worker down.
pub async fn extract_pdf_text(data: &[u8]) -> Result<String, ExtractError> {
    let bytes = data.to_vec();
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ExtractError::Pdf(format!("extractor aborted: {e}")))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))
}
