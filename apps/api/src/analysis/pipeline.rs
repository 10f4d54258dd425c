//! One analysis request: similarity score, then report generation.
//!
//! The two stages share no data. A similarity failure degrades to 0; a
//! generation failure fails the whole request.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::report::generate_report;
use crate::analysis::session::{SubmissionState, MISSING_INPUT};
use crate::analysis::similarity::similarity_score_or_default;
use crate::analysis::verdict::{EvaluationVerdict, MatchVerdict, VerdictView};
use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::llm_client::{TextGenerator, MODEL};

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Embedding similarity, 0–100, one decimal.
    pub ats_score: f64,
    pub ats_verdict: VerdictView<MatchVerdict>,
    pub report: String,
    pub report_scores: Vec<f64>,
    /// Mean criterion score × 20, unrounded. Clients round to a whole
    /// percent for display.
    pub ai_score: f64,
    pub ai_verdict: VerdictView<EvaluationVerdict>,
    pub embedding_model: String,
    pub generation_model: &'static str,
}

/// Runs the analysis for the submitted documents and returns the state to Idle,
/// whether or not the analysis succeeds.
pub async fn run_analysis(
    embedder: &dyn Embedder,
    generator: &dyn TextGenerator,
    state: &mut SubmissionState,
) -> Result<AnalysisResponse, AppError> {
    let submission = state
        .reset()
        .ok_or_else(|| AppError::Validation(MISSING_INPUT.to_string()))?;

    let analysis_id = Uuid::new_v4();
    let span = info_span!("analysis", %analysis_id);

    async move {
        info!(
            "Analyzing resume ({} chars) against job description ({} chars)",
            submission.resume().chars().count(),
            submission.job_description().chars().count()
        );

        let ats_score = similarity_score_or_default(
            embedder,
            submission.resume(),
            submission.job_description(),
        )
        .await;
        info!("ATS similarity score {ats_score}");

        let scored =
            generate_report(generator, submission.resume(), submission.job_description()).await?;

        Ok::<_, AppError>(AnalysisResponse {
            analysis_id,
            generated_at: Utc::now(),
            ats_score,
            ats_verdict: MatchVerdict::from_score(ats_score).into(),
            ai_verdict: EvaluationVerdict::from_score(scored.aggregate).into(),
            ai_score: scored.aggregate,
            report_scores: scored.scores,
            report: scored.report,
            embedding_model: embedder.model_name().to_string(),
            generation_model: MODEL,
        })
    }
    .instrument(span)
    .await
}
