//! Screening pipeline: index uploaded resumes, rank them against a job
//! description, and annotate each match with an LLM summary and interview questions.
//!
//! Flow: parse uploads → add_resumes_to_store → query → summarize + questions per hit.
//! Everything inside one run is sequential.

pub mod handlers;
pub mod prompts;
pub mod upload;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::DEFAULT_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::resume::{truncate_chars, MatchResult, ResumeRecord};
use crate::state::AppState;
use crate::store::{add_resumes_to_store, query};
use prompts::{
    build_questions_prompt, build_summary_prompt, DEFAULT_QUESTION_COUNT, QUESTIONS_MAX_TOKENS,
    SUMMARY_MAX_TOKENS,
};

/// Characters of the stored document shown with each result.
pub const SNIPPET_CHARS: usize = 800;

pub async fn summarize_candidate(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
) -> Result<String, LlmError> {
    let prompt = build_summary_prompt(resume_text, job_description);
    llm.complete(&prompt, DEFAULT_SYSTEM, SUMMARY_MAX_TOKENS).await
}

pub async fn create_questions(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
    n: usize,
) -> Result<String, LlmError> {
    let prompt = build_questions_prompt(resume_text, job_description, n);
    llm.complete(&prompt, DEFAULT_SYSTEM, QUESTIONS_MAX_TOKENS).await
}

/// Indexes `resumes`, retrieves the `top_k` closest candidates in the whole
/// collection, and attaches LLM output to each.
///
/// LLM failures never drop or reorder a candidate: the failing field is replaced
/// with a placeholder that carries the error.
pub async fn process_matching(
    state: &AppState,
    resumes: &[ResumeRecord],
    job_description: &str,
    top_k: usize,
) -> Result<Vec<MatchResult>, AppError> {
    add_resumes_to_store(state.embedder.as_ref(), &state.store, resumes).await?;

    let hits = query(state.embedder.as_ref(), &state.store, job_description, top_k).await?;
    info!(
        "Ranked {} candidate(s) for a {}-char job description",
        hits.len(),
        job_description.chars().count()
    );

    let mut results = Vec::with_capacity(hits.len());
    for hit in hits {
        let summary = match summarize_candidate(&state.llm, &hit.document, job_description).await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Summary for '{}' failed: {e}", hit.id);
                format!("Summary unavailable: {e}")
            }
        };

        let questions = match create_questions(
            &state.llm,
            &hit.document,
            job_description,
            DEFAULT_QUESTION_COUNT,
        )
        .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Questions for '{}' failed: {e}", hit.id);
                format!("Questions unavailable: {e}")
            }
        };

        results.push(MatchResult {
            name: hit.id.clone(),
            file_name: hit.id,
            score: hit.distance,
            snippet: truncate_chars(&hit.document, SNIPPET_CHARS).to_string(),
            summary,
            questions,
            metadata: hit.metadata,
        });
    }

    Ok(results)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::config::Config;
    use crate::embedding::{CachedEmbedder, HashingEmbedder};
    use crate::llm_client::tests::{settings, spawn};
    use crate::store::VectorStore;

    pub(crate) fn test_config(root: &Path) -> Config {
        Config {
            embedding_model: "hash".to_string(),
            embedding_api_url: None,
            embedding_api_key: None,
            embedding_dimensions: 256,
            embedding_cache_dir: root.join("cache"),
            store_persist_dir: root.join("data"),
            completion_api_key: None,
            completion_model: "test-model".to_string(),
            completion_api_url: "http://127.0.0.1:9/".to_string(),
            completion_timeout_secs: 5,
            completion_max_retries: 0,
            max_upload_bytes: 1024 * 1024,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    /// State backed by temp dirs; `llm_url` of `None` means no API key is configured.
    pub(crate) fn test_state(root: &Path, llm_url: Option<String>) -> AppState {
        let config = test_config(root);
        let inner = Arc::new(HashingEmbedder::new("hash", config.embedding_dimensions));
        let embedder = CachedEmbedder::new(inner, &config.embedding_cache_dir).unwrap();
        let store = VectorStore::open(&config.store_persist_dir, "resumes").unwrap();
        let llm = match llm_url {
            Some(url) => LlmClient::new(settings(url, Some("sk-test"))).unwrap(),
            None => LlmClient::new(settings(config.completion_api_url.clone(), None)).unwrap(),
        };
        AppState {
            config,
            embedder: Arc::new(embedder),
            store: Arc::new(store),
            llm,
        }
    }

    fn resume(name: &str, text: &str) -> ResumeRecord {
        ResumeRecord {
            file_name: name.to_string(),
            text: text.to_string(),
            email: None,
            phone: Some("+1 555 010 9999".to_string()),
        }
    }

    /// Echoes which prompt it received so tests can tell summary from questions.
    pub(crate) async fn spawn_echo_llm() -> String {
        let router = Router::new().route(
            "/chat/completions",
            post(|Json(body): Json<Value>| async move {
                let prompt = body["messages"][1]["content"].as_str().unwrap_or_default();
                let reply = if prompt.contains("interview questions") {
                    "1. Q?\nWhat to listen for: A"
                } else {
                    "Solid candidate. Fit score: 80/100"
                };
                Json(json!({"choices": [{"message": {"content": reply}}]}))
            }),
        );
        spawn(router).await
    }

    #[tokio::test]
    async fn test_missing_api_key_yields_placeholders_and_keeps_ranking() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), None);
        let jd = "Rust backend engineer with Postgres";

        let results = process_matching(
            &state,
            &[
                resume("a.pdf", "Watercolour painter and illustrator"),
                resume("b.pdf", jd),
            ],
            jd,
            5,
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].file_name, "b.pdf");
        assert!(results[0].score <= results[1].score);
        for r in &results {
            assert!(r.summary.starts_with("Summary unavailable: "));
            assert!(r.summary.contains("OPENROUTER_API_KEY"));
            assert!(r.questions.starts_with("Questions unavailable: "));
        }
    }

    #[tokio::test]
    async fn test_results_carry_llm_output_snippet_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let url = spawn_echo_llm().await;
        let state = test_state(dir.path(), Some(url));
        let long_text = format!("Rust {}", "systems ".repeat(300));

        let results = process_matching(&state, &[resume("long.docx", &long_text)], "Rust", 3)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.name, "long.docx");
        assert_eq!(r.snippet.chars().count(), SNIPPET_CHARS);
        assert_eq!(r.summary, "Solid candidate. Fit score: 80/100");
        assert!(r.questions.starts_with("1. Q?"));
        assert_eq!(r.metadata.phone.as_deref(), Some("+1 555 010 9999"));
    }

    #[tokio::test]
    async fn test_top_k_limits_results() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), None);
        let resumes: Vec<_> = (0..4)
            .map(|i| resume(&format!("{i}.pdf"), &format!("candidate number {i}")))
            .collect();

        let results = process_matching(&state, &resumes, "candidate", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_earlier_runs_remain_rankable() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), None);

        process_matching(&state, &[resume("old.pdf", "kotlin android")], "kotlin", 1)
            .await
            .unwrap();
        let results = process_matching(&state, &[resume("new.pdf", "rust tokio")], "kotlin", 1)
            .await
            .unwrap();

        assert_eq!(results[0].file_name, "old.pdf");
        assert_eq!(state.store.count().await, 2);
    }
}
