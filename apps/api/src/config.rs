use anyhow::{Context, Result};

use crate::embedding::fastembed::EmbeddingModelChoice;

const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub llm_timeout_secs: u64,
    pub embedding_model: EmbeddingModelChoice,
    /// Where fastembed caches downloaded ONNX weights. `None` uses the crate default.
    pub embedding_cache_dir: Option<String>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            groq_api_url: std::env::var("GROQ_API_URL")
                .unwrap_or_else(|_| DEFAULT_GROQ_API_URL.to_string()),
            llm_timeout_secs: parse_env_or("LLM_TIMEOUT_SECS", 120)?,
            embedding_model: match std::env::var("EMBEDDING_MODEL") {
                Ok(name) => name
                    .parse::<EmbeddingModelChoice>()
                    .map_err(anyhow::Error::msg)
                    .context("EMBEDDING_MODEL is not a supported model")?,
                Err(_) => EmbeddingModelChoice::default(),
            },
            embedding_cache_dir: std::env::var("EMBEDDING_CACHE_DIR").ok(),
            max_upload_bytes: parse_env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            groq_api_key: "test-key".to_string(),
            groq_api_url: DEFAULT_GROQ_API_URL.to_string(),
            llm_timeout_secs: 5,
            embedding_model: EmbeddingModelChoice::default(),
            embedding_cache_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_or_falls_back_when_unset() {
        let value: u16 = parse_env_or("RESUMEGENIUS_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_parse_env_or_rejects_garbage() {
        std::env::set_var("RESUMEGENIUS_TEST_BAD_TIMEOUT", "soon");
        let result: Result<u64> = parse_env_or("RESUMEGENIUS_TEST_BAD_TIMEOUT", 120);
        assert!(result.is_err());
        std::env::remove_var("RESUMEGENIUS_TEST_BAD_TIMEOUT");
    }

    #[test]
    fn test_require_env_names_missing_key() {
        let err = require_env("RESUMEGENIUS_TEST_MISSING_KEY").unwrap_err();
        assert!(err.to_string().contains("RESUMEGENIUS_TEST_MISSING_KEY"));
    }
}
