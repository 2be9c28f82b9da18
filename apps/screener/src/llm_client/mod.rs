/// LLM Client: the single point of entry for all chat-completion calls.
///
/// Speaks the OpenAI-style `/chat/completions` protocol (OpenRouter by default)
/// with bearer-token auth. No other module talks to the completion API directly.
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const REFERER: &str = "http://localhost:8501";
const APP_TITLE: &str = "Resume Screening Agent";
const TEMPERATURE: f32 = 0.2;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OPENROUTER_API_KEY not set in environment")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Settings for `LlmClient`, filled from `Config` at startup.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    settings: LlmSettings,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub fn has_api_key(&self) -> bool {
        self.settings.api_key.is_some()
    }

    /// Sends one system + user message pair and returns the generated text.
    /// 429 and 5xx responses are retried up to `max_retries` times with exponential backoff.
    pub async fn complete(
        &self,
        prompt: &str,
        system: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey)?;

        let request_body = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens,
            temperature: TEMPERATURE,
        };

        let mut attempt = 0;
        loop {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1).min(5)));
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.settings.api_url)
                .bearer_auth(api_key)
                .header("HTTP-Referer", REFERER)
                .header("X-Title", APP_TITLE)
                .json(&request_body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                let retryable = status.as_u16() == 429 || status.is_server_error();
                if retryable && attempt < self.settings.max_retries {
                    warn!(
                        "Completion API returned {status} on attempt {}, retrying",
                        attempt + 1
                    );
                    attempt += 1;
                    continue;
                }
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body: Value = response.json().await?;
            debug!(model = %self.settings.model, "Completion call succeeded");
            return Ok(extract_text(&body));
        }
    }
}

/// Pulls the generated text out of a completion response.
///
/// Probes `choices[0].message.content`, then top-level `output_text` and `output`,
/// and finally falls back to the whole body rendered as JSON.
fn extract_text(body: &Value) -> String {
    if let Some(content) = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
    {
        return content.to_string();
    }

    for key in ["output_text", "output"] {
        match body.get(key) {
            Some(Value::String(s)) => return s.clone(),
            Some(other) if !other.is_null() => return other.to_string(),
            _ => {}
        }
    }

    body.to_string()
}
