//! Core event processing

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::RelayConfig;
use crate::digest::{DigestDispatcher, DigestOutcome};
use crate::error::Result;
use crate::history::{ConversationStore, Message, RetentionWindow};
use crate::metrics::METRICS;
use crate::trigger::{CustomPromptPolicy, TriggerClassification, TriggerPhrases};

/// Orchestrates the per-message flow: classify the text, update the
/// conversation's history, and, on a trigger, run the retention filter
/// and dispatch a summary.
///
/// Holds no per-message state; the store is the only mutable resource.
pub struct RelayService {
    store: Arc<ConversationStore>,
    window: RetentionWindow,
    dispatcher: DigestDispatcher,
    phrases: TriggerPhrases,
    policy: CustomPromptPolicy,
    config: RelayConfig,
}

impl RelayService {
    pub fn new(
        store: Arc<ConversationStore>,
        dispatcher: DigestDispatcher,
        config: RelayConfig,
    ) -> Self {
        let window = RetentionWindow::new(config.retention(), config.effective_ignore_words());
        let phrases = TriggerPhrases::new(&config.trigger_phrase, &config.reset_phrase);
        let policy = CustomPromptPolicy::new(config.custom_prompts, &config.custom_prompt_allowlist);

        Self {
            store,
            window,
            dispatcher,
            phrases,
            policy,
            config,
        }
    }

    /// Process one inbound message and return the reply to deliver, if
    /// any. Internal failures never escape: they are logged and mapped
    /// to the fixed apology reply, so processing one event cannot
    /// affect another.
    pub async fn handle_message(
        &self,
        conversation_id: &str,
        author_id: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Option<String> {
        match self.process(conversation_id, author_id, text, now).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Event processing failed: {}", e);
                Some(self.config.apology_reply.clone())
            }
        }
    }

    async fn process(
        &self,
        conversation_id: &str,
        author_id: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<String>> {
        let custom_enabled = self.policy.is_enabled_for(conversation_id);
        let classification = self.phrases.classify(text, custom_enabled);
        METRICS.record_classification(classification.label());
        debug!(
            "Classified message in conversation as {}",
            classification.label()
        );

        match classification {
            TriggerClassification::Reset => {
                // The reset command itself is not stored
                self.store.clear(conversation_id);
                info!("History reset requested");
                Ok(Some(self.config.reset_reply.clone()))
            }
            TriggerClassification::Plain => {
                self.store
                    .append(Message::new(author_id, conversation_id, text, now));
                Ok(None)
            }
            TriggerClassification::DefaultSummary => {
                self.store
                    .append(Message::new(author_id, conversation_id, text, now));
                Ok(Some(self.summarize(conversation_id, None, now).await))
            }
            TriggerClassification::CustomSummary(instruction) => {
                self.store
                    .append(Message::new(author_id, conversation_id, text, now));
                Ok(Some(
                    self.summarize(conversation_id, Some(instruction.as_str()), now)
                        .await,
                ))
            }
        }
    }

    /// Filter the conversation's history and dispatch a summary.
    ///
    /// The snapshot is taken before the collaborator call so no buffer
    /// lock is held while the request is in flight; the buffer is
    /// re-acquired briefly afterwards to clear it.
    async fn summarize(
        &self,
        conversation_id: &str,
        instruction: Option<&str>,
        now: DateTime<Utc>,
    ) -> String {
        let snapshot = self.store.snapshot(conversation_id);
        let eligible = self.window.eligible_texts(&snapshot, now);

        match self.dispatcher.dispatch(&eligible, instruction).await {
            DigestOutcome::Summary(summary) => {
                if self.config.clear_after_summary {
                    self.store.clear(conversation_id);
                }
                info!("Summary produced from {} messages", eligible.len());
                format!("{}{}", self.config.summary_preamble, summary)
            }
            DigestOutcome::NothingToSummarize => self.config.empty_reply.clone(),
            DigestOutcome::Unavailable => self.config.fallback_reply.clone(),
        }
    }
}
