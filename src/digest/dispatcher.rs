//! Summarization dispatch with an explicit outcome type

use super::summarizer::Summarizer;
use crate::metrics::METRICS;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Result of a summarization dispatch.
///
/// A failed collaborator call is an explicit branch here, never a
/// propagated error: the reply path must not break because the
/// collaborator did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestOutcome {
    /// Generated summary, trimmed of surrounding whitespace
    Summary(String),
    /// No qualifying messages; the collaborator was not invoked
    NothingToSummarize,
    /// The collaborator call failed or timed out
    Unavailable,
}

/// Builds prompts from filtered message texts and invokes the
/// text-generation collaborator.
pub struct DigestDispatcher {
    summarizer: Arc<dyn Summarizer>,
    default_instruction: String,
}

impl DigestDispatcher {
    pub fn new(summarizer: Arc<dyn Summarizer>, default_instruction: impl Into<String>) -> Self {
        Self {
            summarizer,
            default_instruction: default_instruction.into(),
        }
    }

    /// Join message texts under an instruction, newline-separated.
    /// Falls back to the default instruction template when none is given.
    pub fn build_prompt(&self, texts: &[String], instruction: Option<&str>) -> String {
        let instruction = instruction.unwrap_or(self.default_instruction.as_str());
        format!("{}\n{}", instruction, texts.join("\n"))
    }

    /// Summarize the given texts, at most one collaborator attempt.
    pub async fn dispatch(&self, texts: &[String], instruction: Option<&str>) -> DigestOutcome {
        if texts.is_empty() {
            METRICS.record_digest("empty", 0.0);
            return DigestOutcome::NothingToSummarize;
        }

        let prompt = self.build_prompt(texts, instruction);
        debug!("Summarizing {} messages", texts.len());

        let start = Instant::now();
        match self.summarizer.generate(&prompt).await {
            Ok(text) => {
                METRICS.record_digest("success", start.elapsed().as_secs_f64());
                DigestOutcome::Summary(text.trim().to_string())
            }
            Err(e) => {
                METRICS.record_digest("fallback", start.elapsed().as_secs_f64());
                warn!("Summarization failed: {}", e);
                DigestOutcome::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::summarizer::SummarizerError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Test double returning a canned response or a forced failure
    struct FixedSummarizer {
        reply: Option<String>,
        calls: AtomicUsize,
    }

    impl FixedSummarizer {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Summarizer for FixedSummarizer {
        async fn generate(&self, _prompt: &str) -> Result<String, SummarizerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Some(text) => Ok(text.clone()),
                None => Err(SummarizerError::NetworkError("connection refused".to_string())),
            }
        }
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_prompt_with_default_instruction() {
        let dispatcher =
            DigestDispatcher::new(Arc::new(FixedSummarizer::ok("x")), "Summarize this:");
        let prompt = dispatcher.build_prompt(&texts(&["a", "b"]), None);
        assert_eq!(prompt, "Summarize this:\na\nb");
    }

    #[test]
    fn test_build_prompt_with_custom_instruction() {
        let dispatcher =
            DigestDispatcher::new(Arc::new(FixedSummarizer::ok("x")), "Summarize this:");
        let prompt = dispatcher.build_prompt(&texts(&["a"]), Some("Only decisions:"));
        assert_eq!(prompt, "Only decisions:\na");
    }

    #[tokio::test]
    async fn test_dispatch_returns_trimmed_summary() {
        let summarizer = Arc::new(FixedSummarizer::ok("  - point one\n- point two  "));
        let dispatcher = DigestDispatcher::new(summarizer, "Summarize:");

        let outcome = dispatcher.dispatch(&texts(&["hello"]), None).await;
        assert_eq!(
            outcome,
            DigestOutcome::Summary("- point one\n- point two".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_input_skips_collaborator() {
        let summarizer = Arc::new(FixedSummarizer::ok("never"));
        let dispatcher = DigestDispatcher::new(summarizer.clone(), "Summarize:");

        let outcome = dispatcher.dispatch(&[], None).await;
        assert_eq!(outcome, DigestOutcome::NothingToSummarize);
        assert_eq!(summarizer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_collaborator_failure_maps_to_unavailable() {
        let summarizer = Arc::new(FixedSummarizer::failing());
        let dispatcher = DigestDispatcher::new(summarizer.clone(), "Summarize:");

        let outcome = dispatcher.dispatch(&texts(&["hello"]), None).await;
        assert_eq!(outcome, DigestOutcome::Unavailable);
        assert_eq!(summarizer.call_count(), 1);
    }
}
