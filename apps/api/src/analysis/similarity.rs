//! Embedding Similarity Scorer.
//!
//! score = clamp(round(cosine(embed(resume), embed(job)) × 100, 1), 0, 100)
//!
//! Both documents are embedded in full; truncation only applies to the
//! report prompt.

use tracing::{debug, warn};

use crate::embedding::{Embedder, EmbeddingError, EmbeddingResult};

/// Score used when the embedding stage fails.
pub const FALLBACK_SIMILARITY: f64 = 0.0;

/// Cosine similarity of two equal-length, non-zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> EmbeddingResult<f64> {
    if a.len() != b.len() {
        return Err(EmbeddingError::Other(format!(
            "Embedding dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Err(EmbeddingError::Other("Empty embedding vector".to_string()));
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(EmbeddingError::Other("Zero-norm embedding vector".to_string()));
    }

    let cosine = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !cosine.is_finite() {
        return Err(EmbeddingError::Other("Non-finite cosine similarity".to_string()));
    }
    Ok(cosine)
}

/// Cosine → percentage with one decimal. Negative similarity reads as 0.
///
/// Exact halves round away from zero (`f64::round`), not to even.
pub fn to_percentage(cosine: f64) -> f64 {
    let percent = (cosine * 1000.0).round() / 10.0;
    percent.clamp(0.0, 100.0)
}

/// Scores semantic overlap between a resume and a job description.
pub async fn similarity_score(
    embedder: &dyn Embedder,
    resume: &str,
    job_description: &str,
) -> EmbeddingResult<f64> {
    let vectors = embedder.embed(&[resume, job_description]).await?;
    let [resume_vec, job_vec] = vectors.as_slice() else {
        return Err(EmbeddingError::Other(format!(
            "Expected 2 embeddings, got {}",
            vectors.len()
        )));
    };

    let cosine = cosine_similarity(resume_vec, job_vec)?;
    debug!("Raw cosine similarity {cosine:.4}");
    Ok(to_percentage(cosine))
}

/// [`similarity_score`], substituting [`FALLBACK_SIMILARITY`] on failure.
pub async fn similarity_score_or_default(
    embedder: &dyn Embedder,
    resume: &str,
    job_description: &str,
) -> f64 {
    match similarity_score(embedder, resume, job_description).await {
        Ok(score) => score,
        Err(e) => {
            warn!("Error calculating similarity, using {FALLBACK_SIMILARITY}: {e}");
            FALLBACK_SIMILARITY
        }
    }
}
