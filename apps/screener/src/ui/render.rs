//! HTML rendering for the screening page. Plain string building; every
//! user- or model-supplied value goes through `escape_html`.

use std::fmt::Write;

use crate::models::resume::MatchResult;
use crate::screening::upload::{DEFAULT_TOP_K, MAX_TOP_K};
use crate::screening::SNIPPET_CHARS;

const TITLE: &str = "Resume Screening Agent";

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;display:flex;min-height:100vh}\
aside{width:16rem;padding:1.5rem;background:#f3f4f6}\
main{flex:1;padding:1.5rem 2rem;max-width:60rem}\
textarea{width:100%;min-height:12rem}\
pre{background:#f8f8f8;padding:.75rem;white-space:pre-wrap}\
.warning{background:#fff7d6;padding:.75rem}\
.error{background:#fde2e2;padding:.75rem;margin:.25rem 0}\
.success{background:#e0f5e6;padding:.75rem}\
.hint{color:#6b7280;font-size:.9rem}";

/// Values to pre-fill when the form is re-rendered.
#[derive(Debug, Default)]
pub struct FormValues<'a> {
    pub job_description: &'a str,
    pub top_k: Option<usize>,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The input form, optionally preceded by a warning.
pub fn render_form_page(values: &FormValues<'_>, warning: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(msg) = warning {
        let _ = write!(body, "<p class=\"warning\">{}</p>", escape_html(msg));
    }
    page(values, &body)
}

/// Form followed by per-file parse errors and the ranked results.
pub fn render_results_page(
    values: &FormValues<'_>,
    parse_errors: &[String],
    results: &[MatchResult],
) -> String {
    let mut body = String::new();

    for err in parse_errors {
        let _ = write!(body, "<p class=\"error\">{}</p>", escape_html(err));
    }

    let _ = write!(
        body,
        "<p class=\"success\">Found top {} candidates</p>\
         <p class=\"hint\">Score is cosine distance to the job description: lower is closer.</p>",
        results.len()
    );

    for (i, r) in results.iter().enumerate() {
        let email = r.metadata.email.as_deref().unwrap_or("N/A");
        let phone = r.metadata.phone.as_deref().unwrap_or("N/A");
        let _ = write!(
            body,
            "<section>\
             <h3>{rank}. {name} — score: {score:.4}</h3>\
             <p><strong>Contact:</strong></p>\
             <p>Email: {email} | Phone: {phone}</p>\
             <p><strong>Snippet:</strong></p><pre>{snippet}</pre>\
             <p><strong>Summary (LLM):</strong></p><pre>{summary}</pre>\
             <p><strong>Interview Questions (LLM):</strong></p><pre>{questions}</pre>\
             <hr></section>",
            rank = i + 1,
            name = escape_html(&r.name),
            score = r.score,
            email = escape_html(email),
            phone = escape_html(phone),
            snippet = escape_html(crate::models::resume::truncate_chars(&r.snippet, SNIPPET_CHARS)),
            summary = escape_html(&r.summary),
            questions = escape_html(&r.questions),
        );
    }

    page(values, &body)
}

fn page(values: &FormValues<'_>, body: &str) -> String {
    let top_k = values.top_k.unwrap_or(DEFAULT_TOP_K);
    format!(
        "<!DOCTYPE html>\
<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{TITLE}</title><style>{STYLE}</style></head>\
<body><form method=\"post\" action=\"/screen\" enctype=\"multipart/form-data\" style=\"display:contents\">\
<aside><h2>Settings</h2>\
<label for=\"top_k\">Top K candidates to show</label>\
<input type=\"number\" id=\"top_k\" name=\"top_k\" min=\"1\" max=\"{MAX_TOP_K}\" value=\"{top_k}\"></aside>\
<main><h1>{TITLE}</h1>\
<h2>Job Description</h2>\
<textarea name=\"job_description\" placeholder=\"Paste job description here\">{jd}</textarea>\
<h2>Upload Resumes (PDF / DOCX)</h2>\
<input type=\"file\" name=\"files\" multiple accept=\".pdf,.docx\">\
<p><button type=\"submit\">Run Screening</button></p>\
{body}</main></form></body></html>",
        jd = escape_html(values.job_description),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ContactMetadata;

    #[test]
    fn test_escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_form_page_prefills_and_warns() {
        let html = render_form_page(
            &FormValues {
                job_description: "Rust <dev>",
                top_k: Some(9),
            },
            Some("Please upload at least one resume."),
        );
        assert!(html.contains("Rust &lt;dev&gt;</textarea>"));
        assert!(html.contains("value=\"9\""));
        assert!(html.contains("Please upload at least one resume."));
    }

    #[test]
    fn test_results_page_lists_candidates_and_missing_contacts() {
        let results = vec![MatchResult {
            name: "jane.pdf".to_string(),
            file_name: "jane.pdf".to_string(),
            score: 0.123456,
            snippet: "Rust engineer".to_string(),
            summary: "Summary unavailable: OPENROUTER_API_KEY not set in environment".to_string(),
            questions: "1. <b>Why</b> Rust?".to_string(),
            metadata: ContactMetadata {
                email: Some("jane@example.com".to_string()),
                phone: None,
            },
        }];

        let html = render_results_page(
            &FormValues::default(),
            &["Failed to parse bad.docx: DOCX extraction failed".to_string()],
            &results,
        );

        assert!(html.contains("Found top 1 candidates"));
        assert!(html.contains("1. jane.pdf — score: 0.1235"));
        assert!(html.contains("Email: jane@example.com | Phone: N/A"));
        assert!(html.contains("Failed to parse bad.docx"));
        assert!(html.contains("1. &lt;b&gt;Why&lt;/b&gt; Rust?"));
    }
}
