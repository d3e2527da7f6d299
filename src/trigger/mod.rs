//! Trigger interpretation for inbound messages
//!
//! Classifies each message as plain content, a reset command, or a
//! summary request, as a total function over the message text and the
//! conversation's custom-prompt policy. All branches are enumerated;
//! there is no fallthrough parsing.

use glob::Pattern;

/// How an inbound message should be handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerClassification {
    /// Ordinary content: store only
    Plain,
    /// Reset command: clear the conversation's history
    Reset,
    /// Summary request using the default instruction
    DefaultSummary,
    /// Summary request with a caller-supplied instruction
    CustomSummary(String),
}

impl TriggerClassification {
    /// Label used for metrics and logs
    pub fn label(&self) -> &'static str {
        match self {
            TriggerClassification::Plain => "plain",
            TriggerClassification::Reset => "reset",
            TriggerClassification::DefaultSummary => "default_summary",
            TriggerClassification::CustomSummary(_) => "custom_summary",
        }
    }
}

/// Phrase configuration for the interpreter
#[derive(Debug, Clone)]
pub struct TriggerPhrases {
    trigger: String,
    reset: String,
}

impl TriggerPhrases {
    pub fn new(trigger: impl Into<String>, reset: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            reset: reset.into(),
        }
    }

    /// Classify one message.
    ///
    /// `custom_prompts_enabled` is the already-resolved per-conversation
    /// policy; the interpreter consults it but does not own it.
    pub fn classify(&self, text: &str, custom_prompts_enabled: bool) -> TriggerClassification {
        let trimmed = text.trim();

        if trimmed.eq_ignore_ascii_case(self.reset.trim()) {
            return TriggerClassification::Reset;
        }

        match strip_prefix_ignore_case(trimmed, self.trigger.trim()) {
            Some(rest) => {
                let instruction = rest.trim();
                if instruction.is_empty() || !custom_prompts_enabled {
                    TriggerClassification::DefaultSummary
                } else {
                    TriggerClassification::CustomSummary(instruction.to_string())
                }
            }
            None => TriggerClassification::Plain,
        }
    }
}

/// Per-conversation custom-prompt policy: a global switch plus an
/// allow-list of glob patterns over conversation ids.
#[derive(Debug, Clone)]
pub struct CustomPromptPolicy {
    enabled_globally: bool,
    allowlist: Vec<Pattern>,
}

impl CustomPromptPolicy {
    pub fn new(enabled_globally: bool, allowlist: &[String]) -> Self {
        Self {
            enabled_globally,
            allowlist: allowlist
                .iter()
                .filter_map(|p| Pattern::new(p).ok())
                .collect(),
        }
    }

    pub fn is_enabled_for(&self, conversation_id: &str) -> bool {
        self.enabled_globally
            || self.allowlist.iter().any(|p| p.matches(conversation_id))
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() || text.len() < prefix.len() {
        return None;
    }
    // Byte-length slicing is safe here only if the boundary is a char
    // boundary; get() returns None otherwise instead of panicking.
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases() -> TriggerPhrases {
        TriggerPhrases::new("!summary", "!reset")
    }

    #[test]
    fn test_plain_message() {
        assert_eq!(
            phrases().classify("what time is the standup?", true),
            TriggerClassification::Plain
        );
    }

    #[test]
    fn test_reset_exact_match() {
        assert_eq!(phrases().classify("!reset", true), TriggerClassification::Reset);
        assert_eq!(
            phrases().classify("  !RESET  ", false),
            TriggerClassification::Reset
        );
    }

    #[test]
    fn test_reset_with_trailing_text_is_not_reset() {
        // Only the exact phrase resets; anything longer is a plain message
        assert_eq!(
            phrases().classify("!reset everything please", true),
            TriggerClassification::Plain
        );
    }

    #[test]
    fn test_bare_trigger_is_default_summary() {
        assert_eq!(
            phrases().classify("!summary", true),
            TriggerClassification::DefaultSummary
        );
        assert_eq!(
            phrases().classify("!Summary   ", true),
            TriggerClassification::DefaultSummary
        );
    }

    #[test]
    fn test_trigger_with_text_and_custom_enabled() {
        assert_eq!(
            phrases().classify("!summary focus on action items", true),
            TriggerClassification::CustomSummary("focus on action items".to_string())
        );
    }

    #[test]
    fn test_trigger_with_text_and_custom_disabled() {
        assert_eq!(
            phrases().classify("!summary focus on action items", false),
            TriggerClassification::DefaultSummary
        );
    }

    #[test]
    fn test_trigger_must_be_prefix() {
        assert_eq!(
            phrases().classify("could someone run !summary?", true),
            TriggerClassification::Plain
        );
    }

    #[test]
    fn test_message_shorter_than_trigger() {
        assert_eq!(phrases().classify("!s", true), TriggerClassification::Plain);
        assert_eq!(phrases().classify("", true), TriggerClassification::Plain);
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let phrases = TriggerPhrases::new("!summary", "!reset");
        assert_eq!(
            phrases.classify("émoji ünïcode tëxt", true),
            TriggerClassification::Plain
        );
    }

    #[test]
    fn test_policy_global_switch() {
        let policy = CustomPromptPolicy::new(true, &[]);
        assert!(policy.is_enabled_for("anything"));

        let policy = CustomPromptPolicy::new(false, &[]);
        assert!(!policy.is_enabled_for("anything"));
    }

    #[test]
    fn test_policy_allowlist_globs() {
        let policy = CustomPromptPolicy::new(false, &["group-*".to_string()]);
        assert!(policy.is_enabled_for("group-42"));
        assert!(!policy.is_enabled_for("user-42"));
    }

    #[test]
    fn test_policy_invalid_pattern_is_skipped() {
        let policy = CustomPromptPolicy::new(false, &["[".to_string(), "ok-*".to_string()]);
        assert!(policy.is_enabled_for("ok-1"));
        assert!(!policy.is_enabled_for("["));
    }
}
