//! Sentence-embedding boundary.
//!
//! The similarity scorer only sees the `Embedder` trait, so any provider that
//! returns one fixed-dimension vector per input string can be swapped in.

pub mod fastembed;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while computing embeddings.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Invalid input text: {0}")]
    InvalidInput(String),

    /// Model could not be loaded (download failure, bad cache dir, ...)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unexpected error: {0}")]
    Other(String),
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Text embedding provider.
///
/// Carried in `AppState` as `Arc<dyn Embedder>`.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds each text, returning vectors in the same order as `texts`.
    async fn embed(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>>;

    /// Identifier of the underlying model, reported alongside scores.
    fn model_name(&self) -> &str;
}
