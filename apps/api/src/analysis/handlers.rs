//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::analysis::pipeline::{run_analysis, AnalysisResponse};
use crate::analysis::session::{SubmissionState, MISSING_INPUT};
use crate::errors::AppError;
use crate::extraction::extract_pdf_text_blocking;
use crate::state::AppState;

pub const REPORT_FILE_NAME: &str = "resume_analysis_report.txt";

const RESUME_FIELD: &str = "resume";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub report: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart form: `resume` (PDF file) and `job_description` (text).
/// Extracts the resume text, then scores it against the job description.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut resume_pdf: Option<Vec<u8>> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            RESUME_FIELD => {
                if let Some(content_type) = field.content_type() {
                    if !is_pdf_content_type(content_type) {
                        return Err(AppError::Validation(format!(
                            "Resume must be a PDF, got '{content_type}'"
                        )));
                    }
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read resume upload: {e}")))?;
                resume_pdf = Some(bytes.to_vec());
            }
            JOB_DESCRIPTION_FIELD => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Could not read job description: {e}"))
                })?;
                job_description = Some(text);
            }
            other => tracing::debug!("Ignoring unknown form field '{other}'"),
        }
    }

    let (Some(resume_pdf), Some(job_description)) = (resume_pdf, job_description) else {
        return Err(AppError::Validation(MISSING_INPUT.to_string()));
    };
    if resume_pdf.is_empty() || job_description.trim().is_empty() {
        return Err(AppError::Validation(MISSING_INPUT.to_string()));
    }

    let resume_text = extract_pdf_text_blocking(resume_pdf).await?;

    let mut session = SubmissionState::default();
    session.submit(resume_text, job_description)?;
    let response = run_analysis(state.embedder.as_ref(), state.generator.as_ref(), &mut session).await?;

    Ok(Json(response))
}

/// POST /api/v1/analyze/text
///
/// Same analysis for clients that already have the resume as plain text.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut session = SubmissionState::default();
    session.submit(request.resume_text, request.job_description)?;
    let response = run_analysis(state.embedder.as_ref(), state.generator.as_ref(), &mut session).await?;

    Ok(Json(response))
}

/// POST /api/v1/report/export
///
/// Returns the report as a downloadable plain-text file.
pub async fn handle_export_report(
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.report.trim().is_empty() {
        return Err(AppError::Validation("report cannot be empty".to_string()));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILE_NAME}\""),
            ),
        ],
        request.report,
    ))
}

fn is_pdf_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/pdf")
        || essence.eq_ignore_ascii_case("application/octet-stream")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_content_types() {
        assert!(is_pdf_content_type("application/pdf"));
        assert!(is_pdf_content_type("Application/PDF; charset=binary"));
        assert!(is_pdf_content_type("application/octet-stream"));
        assert!(!is_pdf_content_type("image/png"));
        assert!(!is_pdf_content_type("text/plain"));
    }
}
