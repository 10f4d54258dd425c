// Resume analysis: embedding similarity plus an LLM-written, regex-scored report.
// All generation calls go through llm_client, never to Groq directly.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod session;
pub mod similarity;
pub mod verdict;
