//! Local ONNX sentence embeddings via fastembed.
//!
//! The model is loaded on first use and then shared read-only for the life of
//! the process. Loading and inference are CPU-bound, so both run on the
//! blocking pool.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tokio::sync::OnceCell;
use tracing::info;

use super::{Embedder, EmbeddingError, EmbeddingResult};

/// Embedding models the service can be configured with (`EMBEDDING_MODEL`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmbeddingModelChoice {
    AllMiniLmL6V2,
    /// sentence-transformers/all-mpnet-base-v2, 768 dimensions.
    #[default]
    AllMpnetBaseV2,
    ParaphraseMpnetBaseV2,
    BgeSmallEnV15,
    BgeBaseEnV15,
}

impl EmbeddingModelChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllMiniLmL6V2 => "all-minilm-l6-v2",
            Self::AllMpnetBaseV2 => "all-mpnet-base-v2",
            Self::ParaphraseMpnetBaseV2 => "paraphrase-multilingual-mpnet-base-v2",
            Self::BgeSmallEnV15 => "bge-small-en-v1.5",
            Self::BgeBaseEnV15 => "bge-base-en-v1.5",
        }
    }

    fn fastembed_model(&self) -> EmbeddingModel {
        match self {
            Self::AllMiniLmL6V2 => EmbeddingModel::AllMiniLML6V2,
            Self::AllMpnetBaseV2 => EmbeddingModel::AllMpnetBaseV2,
            Self::ParaphraseMpnetBaseV2 => EmbeddingModel::ParaphraseMLMpnetBaseV2,
            Self::BgeSmallEnV15 => EmbeddingModel::BGESmallENV15,
            Self::BgeBaseEnV15 => EmbeddingModel::BGEBaseENV15,
        }
    }
}

impl FromStr for EmbeddingModelChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all-minilm-l6-v2" => Ok(Self::AllMiniLmL6V2),
            "all-mpnet-base-v2" | "mpnet" => Ok(Self::AllMpnetBaseV2),
            "paraphrase-multilingual-mpnet-base-v2" => Ok(Self::ParaphraseMpnetBaseV2),
            "bge-small-en-v1.5" => Ok(Self::BgeSmallEnV15),
            "bge-base-en-v1.5" => Ok(Self::BgeBaseEnV15),
            other => Err(format!("unknown embedding model '{other}'")),
        }
    }
}

type SharedModel = Arc<Mutex<TextEmbedding>>;

pub struct FastEmbedProvider {
    choice: EmbeddingModelChoice,
    cache_dir: Option<PathBuf>,
    model: OnceCell<SharedModel>,
}

impl FastEmbedProvider {
    /// Builds the provider without touching the model; weights load on first `embed`.
    pub fn new(choice: EmbeddingModelChoice, cache_dir: Option<String>) -> Self {
        Self {
            choice,
            cache_dir: cache_dir.map(PathBuf::from),
            model: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Get-or-create accessor for the process-wide model.
    /// Concurrent first callers wait on the same initialization.
    async fn model(&self) -> EmbeddingResult<SharedModel> {
        self.model
            .get_or_try_init(|| async {
                let mut options = InitOptions::new(self.choice.fastembed_model());
                if let Some(dir) = &self.cache_dir {
                    options = options.with_cache_dir(dir.clone());
                }

                info!("Loading embedding model {}...", self.choice.as_str());
                let model = tokio::task::spawn_blocking(move || TextEmbedding::try_new(options))
                    .await
                    .map_err(|e| EmbeddingError::Other(format!("Model loading task failed: {e}")))?
                    .map_err(|e| {
                        EmbeddingError::ConfigError(format!(
                            "Failed to initialize FastEmbed model: {e}"
                        ))
                    })?;
                info!("Embedding model {} loaded", self.choice.as_str());

                Ok::<_, EmbeddingError>(Arc::new(Mutex::new(model)))
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl Embedder for FastEmbedProvider {
    async fn embed(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        if texts.iter().any(|t| t.trim().is_empty()) {
            return Err(EmbeddingError::InvalidInput(
                "All texts must be non-empty".to_string(),
            ));
        }

        let model = self.model().await?;
        let owned: Vec<String> = texts.iter().map(|&s| s.to_string()).collect();
        let expected = owned.len();

        let embeddings = tokio::task::spawn_blocking(move || {
            let mut guard = model
                .lock()
                .map_err(|_| EmbeddingError::Other("Embedding model lock poisoned".to_string()))?;
            guard
                .embed(owned, None)
                .map_err(|e| EmbeddingError::Other(format!("Embedding generation failed: {e}")))
        })
        .await
        .map_err(|e| EmbeddingError::Other(format!("Embedding task failed: {e}")))??;

        if embeddings.len() != expected {
            return Err(EmbeddingError::Other(format!(
                "Expected {expected} embeddings, model returned {}",
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        self.choice.as_str()
    }
}

impl std::fmt::Debug for FastEmbedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedProvider")
            .field("model", &self.choice)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
