// Prompt text for the resume evaluation report.
// The five criteria and their order are load-bearing: the report scorer
// averages every `X/5` the model writes back.

/// Criterion sections the model is asked to produce, in order.
pub const CRITERIA: [&str; 5] = [
    "Skills Match",
    "Experience Alignment",
    "Education & Certifications",
    "Keywords & ATS Optimization",
    "Overall Presentation",
];

/// Heading of the closing advice section.
pub const SUGGESTIONS_HEADING: &str = "## 💡 Suggestions to Improve Your Resume:";

/// Builds the evaluation prompt. Inputs must already be truncated.
pub fn report_prompt(resume: &str, job_description: &str) -> String {
    let sections = CRITERIA
        .iter()
        .map(|c| format!("   - **{c}**"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
You are ResumeGenius AI, an expert ATS and resume consultant. Analyze the candidate's resume against the job description.

# Instructions:
1. Evaluate the resume on key criteria from the job description
2. For each criterion, provide:
   - Score out of 5 (format: X/5)
   - ✅ if aligned, ❌ if missing, ⚠️ if unclear
   - Detailed explanation

3. Structure your response with these sections:
{sections}

4. End with "{SUGGESTIONS_HEADING}" section with actionable tips

# Inputs:
**Resume:**
{resume}

**Job Description:**
{job_description}

# Output Format:
Use clear headers, scores at the start of each point, and provide specific, actionable feedback.
"#
    )
}
