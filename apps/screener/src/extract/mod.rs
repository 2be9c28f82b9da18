//! Document extractor: turns an uploaded resume into plain text plus contact details.
//!
//! Dispatch is by file extension only. `.pdf` goes through the PDF text layer,
//! everything else is treated as DOCX. Missing contact details are not an error.

pub mod contact;
pub mod docx;
pub mod pdf;

use thiserror::Error;
use tracing::debug;

use crate::models::resume::ResumeRecord;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracts text, email and phone from one uploaded file.
pub async fn parse_resume(file_name: &str, data: &[u8]) -> Result<ResumeRecord, ExtractError> {
    let text = if file_name.to_lowercase().ends_with(".pdf") {
        pdf::extract_pdf_text(data).await?
    } else {
        docx::extract_docx_text(data)?
    };

    let email = contact::extract_email(&text);
    let phone = contact::extract_phone(&text);
    debug!(
        file_name,
        chars = text.chars().count(),
        has_email = email.is_some(),
        has_phone = phone.is_some(),
        "Parsed resume"
    );

    Ok(ResumeRecord {
        file_name: file_name.to_string(),
        text,
        email,
        phone,
    })
}

#[cfg(test)]
mod tests {
    use super::docx::tests::build_docx;
    use super::*;

    #[tokio::test]
    async fn test_docx_resume_with_contact_details() {
        let bytes = build_docx(&[
            "Jane Doe",
            "jane@example.com | +44 7700 900123",
            "Rust, Tokio, Postgres",
        ]);
        let record = parse_resume("jane.docx", &bytes).await.unwrap();

        assert_eq!(record.file_name, "jane.docx");
        assert!(record.text.contains("Rust, Tokio, Postgres"));
        assert_eq!(record.email.as_deref(), Some("jane@example.com"));
        assert_eq!(record.phone.as_deref(), Some("+44 7700 900123"));
    }

    #[tokio::test]
    async fn test_missing_contact_details_are_none() {
        let bytes = build_docx(&["Anonymous candidate", "Go and Kubernetes"]);
        let record = parse_resume("anon.docx", &bytes).await.unwrap();
        assert!(record.email.is_none());
        assert!(record.phone.is_none());
    }

    #[tokio::test]
    async fn test_same_bytes_give_same_text() {
        let bytes = build_docx(&["Deterministic", "output"]);
        let first = parse_resume("a.docx", &bytes).await.unwrap();
        let second = parse_resume("a.docx", &bytes).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_extension_match_is_case_insensitive() {
        // Uppercase .PDF must take the PDF path, so DOCX bytes fail as a PDF.
        let bytes = build_docx(&["Not really a PDF"]);
        let result = parse_resume("RESUME.PDF", &bytes).await;
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }

    #[tokio::test]
    async fn test_unknown_extension_is_treated_as_docx() {
        let bytes = build_docx(&["Plain body"]);
        let record = parse_resume("resume.doc", &bytes).await.unwrap();
        assert_eq!(record.text, "Plain body");
    }
}
