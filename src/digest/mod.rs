//! Summarization of recent conversation activity

pub mod dispatcher;
pub mod summarizer;

pub use dispatcher::{DigestDispatcher, DigestOutcome};
pub use summarizer::{LlmSummarizer, Summarizer, SummarizerConfig, SummarizerError};
