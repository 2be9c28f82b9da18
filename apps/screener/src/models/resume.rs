use serde::{Deserialize, Serialize};

/// Text and contact details pulled out of one uploaded resume.
/// Lives only for the duration of a screening run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub file_name: String,
    pub text: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ResumeRecord {
    pub fn contact(&self) -> ContactMetadata {
        ContactMetadata {
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Metadata stored alongside each candidate vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactMetadata {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// One ranked candidate returned by the matching pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub name: String,
    pub file_name: String,
    /// Cosine distance to the job description. Lower is closer.
    pub score: f32,
    pub snippet: String,
    pub summary: String,
    pub questions: String,
    pub metadata: ContactMetadata,
}

/// Returns at most `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_shorter_text_is_unchanged() {
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte_boundaries() {
        let text = "héllo wörld";
        assert_eq!(truncate_chars(text, 5), "héllo");
        assert_eq!(truncate_chars(text, 0), "");
    }

    #[test]
    fn test_match_result_serializes_metadata_nulls() {
        let result = MatchResult {
            name: "jane.pdf".to_string(),
            file_name: "jane.pdf".to_string(),
            score: 0.12,
            snippet: "Rust engineer".to_string(),
            summary: "Strong fit".to_string(),
            questions: "1. Tell me about ownership".to_string(),
            metadata: ContactMetadata::default(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["metadata"]["email"].is_null());
        assert_eq!(json["file_name"], "jane.pdf");
    }
}
