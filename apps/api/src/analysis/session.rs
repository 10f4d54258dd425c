//! Submission lifecycle for one analysis: Idle → Submitted → Idle.
//!
//! The state is an ordinary value owned by the request path. Nothing here is
//! global or shared between requests.

use crate::errors::AppError;

pub const MISSING_INPUT: &str = "Please upload both resume and job description!";

/// Extracted resume text and job description accepted for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    resume: String,
    job_description: String,
}

impl Submission {
    pub fn resume(&self) -> &str {
        &self.resume
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitted(Submission),
}

impl SubmissionState {
    /// Accepts a submission. Both inputs must contain non-whitespace text;
    /// on rejection the state is left unchanged.
    pub fn submit(&mut self, resume: String, job_description: String) -> Result<(), AppError> {
        if resume.trim().is_empty() || job_description.trim().is_empty() {
            return Err(AppError::Validation(MISSING_INPUT.to_string()));
        }

        *self = SubmissionState::Submitted(Submission {
            resume,
            job_description,
        });
        Ok(())
    }

    /// Returns to Idle, handing back whatever was submitted.
    pub fn reset(&mut self) -> Option<Submission> {
        match std::mem::take(self) {
            SubmissionState::Submitted(submission) => Some(submission),
            SubmissionState::Idle => None,
        }
    }
}
