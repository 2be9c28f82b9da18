use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_COMPLETION_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Application configuration loaded from environment variables.
/// Every field has a default except the optional API endpoints and keys.
#[derive(Debug, Clone)]
pub struct Config {
    pub embedding_model: String,
    /// OpenAI-compatible embeddings endpoint. `None` selects the local hashing embedder.
    pub embedding_api_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_dimensions: usize,
    pub embedding_cache_dir: PathBuf,
    pub store_persist_dir: PathBuf,
    /// Missing key is not a startup error: completion calls fail and the
    /// pipeline substitutes placeholder text.
    pub completion_api_key: Option<String>,
    pub completion_model: String,
    pub completion_api_url: String,
    pub completion_timeout_secs: u64,
    pub completion_max_retries: u32,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            embedding_model: env_or("EMBEDDING_MODEL", "all-MiniLM-L6-v2"),
            embedding_api_url: optional_env("EMBEDDING_API_URL"),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_dimensions: parse_env("EMBEDDING_DIMENSIONS", 384)?,
            embedding_cache_dir: PathBuf::from(env_or("EMBEDDING_CACHE_DIR", "cache_embeddings")),
            store_persist_dir: PathBuf::from(env_or("STORE_PERSIST_DIR", "data")),
            completion_api_key: optional_env("OPENROUTER_API_KEY"),
            completion_model: env_or("OPENROUTER_MODEL", "gpt-4o-mini"),
            completion_api_url: env_or("COMPLETION_API_URL", DEFAULT_COMPLETION_URL),
            completion_timeout_secs: parse_env("COMPLETION_TIMEOUT_SECS", 30)?,
            completion_max_retries: parse_env("COMPLETION_MAX_RETRIES", 0)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 25 * 1024 * 1024)?,
            port: parse_env("PORT", 8501).context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Empty values count as unset so `OPENROUTER_API_KEY=` in a .env behaves like no key.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default_when_unset() {
        let value: u64 = parse_env("SCREENER_TEST_UNSET_NUMBER", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("SCREENER_TEST_BAD_NUMBER", "not-a-number");
        let result: Result<u16> = parse_env("SCREENER_TEST_BAD_NUMBER", 1);
        assert!(result.is_err());
        std::env::remove_var("SCREENER_TEST_BAD_NUMBER");
    }

    #[test]
    fn test_optional_env_treats_blank_as_unset() {
        std::env::set_var("SCREENER_TEST_BLANK_KEY", "   ");
        assert!(optional_env("SCREENER_TEST_BLANK_KEY").is_none());
        std::env::remove_var("SCREENER_TEST_BLANK_KEY");
    }
}
