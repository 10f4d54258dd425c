//! Report Generator & Score Extractor.
//!
//! Builds the evaluation prompt, makes the single generation call, and
//! distils the narrative into an average of its `X/5` criterion scores.
//!
//! Extraction is a whole-text scan: any `N/5` in the narrative counts, not
//! only the ones under a criterion heading.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::prompts::report_prompt;
use crate::llm_client::{GenerationRequest, LlmError, TextGenerator, MODEL};

pub const RESUME_CHAR_LIMIT: usize = 3000;
pub const JOB_DESCRIPTION_CHAR_LIMIT: usize = 1500;
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 2500;

/// Maps the 0–5 criterion scale onto a percentage.
const SCALE_TO_PERCENT: f64 = 20.0;

// ASCII digits only; scores in other numeral systems are not counted.
static SCORE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)/5").unwrap());

/// Generated narrative plus the scores pulled out of it.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredReport {
    pub report: String,
    pub scores: Vec<f64>,
    /// Mean criterion score as a percentage; 0 when the report has no scores.
    pub aggregate: f64,
}

impl ScoredReport {
    pub fn from_report(report: String) -> Self {
        let scores = extract_scores(&report);
        let aggregate = aggregate_score(&scores);
        Self {
            report,
            scores,
            aggregate,
        }
    }
}

/// First `max_chars` characters of `text` (Unicode scalar values, not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Builds the evaluation prompt from the truncated resume and job description.
pub fn build_report_prompt(resume: &str, job_description: &str) -> String {
    report_prompt(
        truncate_chars(resume, RESUME_CHAR_LIMIT),
        truncate_chars(job_description, JOB_DESCRIPTION_CHAR_LIMIT),
    )
}

pub fn generation_request(resume: &str, job_description: &str) -> GenerationRequest {
    GenerationRequest {
        prompt: build_report_prompt(resume, job_description),
        model: MODEL.to_string(),
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

/// Every `<number>/5` in the text, left to right.
pub fn extract_scores(report: &str) -> Vec<f64> {
    SCORE_PATTERN
        .captures_iter(report)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Mean × 20, or 0 for an empty slice.
pub fn aggregate_score(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    mean * SCALE_TO_PERCENT
}

/// Generates the narrative report and scores it.
/// A generation failure is returned as-is; nothing partial is produced.
pub async fn generate_report(
    generator: &dyn TextGenerator,
    resume: &str,
    job_description: &str,
) -> Result<ScoredReport, LlmError> {
    let request = generation_request(resume, job_description);
    debug!("Report prompt is {} characters", request.prompt.chars().count());

    let report = generator.generate(&request).await?;
    let scored = ScoredReport::from_report(report);

    if scored.scores.is_empty() {
        info!("Report contained no criterion scores; AI score defaults to 0");
    } else {
        info!(
            "Report scored: {} criterion scores, aggregate {:.1}",
            scored.scores.len(),
            scored.aggregate
        );
    }

    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::prompts::{CRITERIA, SUGGESTIONS_HEADING};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingGenerator {
        reply: Result<String, ()>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone().map_err(|_| LlmError::EmptyContent)
        }
    }

    #[test]
    fn test_extracts_integer_and_decimal_scores() {
        let scores = extract_scores("Skills Match: 4/5 ... Experience: 3.5/5");
        assert_eq!(scores, vec![4.0, 3.5]);
        assert!((aggregate_score(&scores) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_scores_aggregate_is_zero() {
        let scores = extract_scores("A thoughtful report without any ratings at all.");
        assert!(scores.is_empty());
        assert_eq!(aggregate_score(&scores), 0.0);
    }

    #[test]
    fn test_incidental_matches_are_counted() {
        let scores = extract_scores("...work week is 5/5 days busy. Skills: 2/5");
        assert_eq!(scores, vec![5.0, 2.0]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let report = "**Skills Match** 4/5 ✅\n**Overall Presentation** 2.5/5 ⚠️\nrated 10/5 by peers";
        assert_eq!(extract_scores(report), extract_scores(report));
        assert_eq!(extract_scores(report), vec![4.0, 2.5, 10.0]);
    }

    #[test]
    fn test_scores_are_not_bounded() {
        // Values are trusted as written
        let scores = extract_scores("Keywords 7/5");
        assert_eq!(scores, vec![7.0]);
        assert!((aggregate_score(&scores) - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_ascii_digits_are_not_scores() {
        assert!(extract_scores("Skills Match: ٤/5").is_empty());
        assert_eq!(extract_scores("٤/5 then 3/5"), vec![3.0]);
    }

    #[test]
    fn test_other_denominators_ignored() {
        assert!(extract_scores("rated 4/10 and 3/4").is_empty());
        // "/50" still contains "/5"
        assert_eq!(extract_scores("got 45/50"), vec![45.0]);
    }

    #[test]
    fn test_truncate_chars_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 3000), "short");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[test]
    fn test_prompt_truncates_resume_and_job_description() {
        let resume = format!("{}{}", "r".repeat(3000), "Ω".repeat(2000));
        let job = format!("{}{}", "j".repeat(1500), "ß".repeat(500));

        let prompt = build_report_prompt(&resume, &job);

        assert!(prompt.contains(&"r".repeat(3000)));
        assert!(prompt.contains(&"j".repeat(1500)));
        assert!(!prompt.contains('Ω'));
        assert!(!prompt.contains('ß'));
    }

    #[test]
    fn test_prompt_lists_criteria_in_order() {
        let prompt = build_report_prompt("resume", "job");
        let positions: Vec<usize> = CRITERIA
            .iter()
            .map(|c| prompt.find(c).expect("criterion missing from prompt"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(prompt.find(SUGGESTIONS_HEADING).unwrap() > positions[4]);
        assert!(prompt.contains("X/5"));
    }

    #[test]
    fn test_prompt_keeps_braces_in_inputs_verbatim() {
        let prompt = build_report_prompt("uses {job_description} in templates", "job");
        assert!(prompt.contains("uses {job_description} in templates"));
    }

    #[tokio::test]
    async fn test_generate_report_uses_fixed_model_parameters() {
        let generator = RecordingGenerator {
            reply: Ok("Skills Match: 4/5\nExperience Alignment: 3/5".to_string()),
            seen: Mutex::new(vec![]),
        };

        let scored = generate_report(&generator, "resume", "job").await.unwrap();

        assert_eq!(scored.scores, vec![4.0, 3.0]);
        assert!((scored.aggregate - 70.0).abs() < 1e-9);

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "llama-3.3-70b-versatile");
        assert_eq!(seen[0].temperature, 0.7);
        assert_eq!(seen[0].max_tokens, 2500);
    }

    #[tokio::test]
    async fn test_generate_report_failure_produces_nothing() {
        let generator = RecordingGenerator {
            reply: Err(()),
            seen: Mutex::new(vec![]),
        };
        let result = generate_report(&generator, "resume", "job").await;
        assert!(matches!(result, Err(LlmError::EmptyContent)));
    }
}
