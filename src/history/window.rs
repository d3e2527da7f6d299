//! Retention window filter over a history snapshot

use super::models::Message;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Selects the messages eligible for summarization: recent enough and
/// free of any ignore-word substring.
///
/// Ignore words are matched case-insensitively anywhere in the text and
/// always include the trigger phrase, so trigger invocations never end
/// up summarizing themselves.
#[derive(Debug, Clone)]
pub struct RetentionWindow {
    max_age: chrono::Duration,
    ignore_words: Vec<String>,
}

impl RetentionWindow {
    pub fn new(max_age: Duration, ignore_words: Vec<String>) -> Self {
        Self {
            max_age: chrono::Duration::from_std(max_age)
                .unwrap_or_else(|_| chrono::Duration::seconds(86400)),
            ignore_words: ignore_words
                .into_iter()
                .map(|w| w.to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Ordered texts of the messages that qualify at `now`.
    /// Empty output is a defined outcome, not an error.
    pub fn eligible_texts(&self, messages: &[Message], now: DateTime<Utc>) -> Vec<String> {
        messages
            .iter()
            .filter(|m| m.age(now) < self.max_age)
            .filter(|m| !self.is_ignored(&m.text))
            .map(|m| m.text.clone())
            .collect()
    }

    fn is_ignored(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.ignore_words.iter().any(|w| lowered.contains(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64, text: &str) -> Message {
        Message::new(
            "author",
            "c1",
            text,
            Utc.timestamp_opt(secs, 0).unwrap(),
        )
    }

    fn window(ignore: &[&str]) -> RetentionWindow {
        RetentionWindow::new(
            Duration::from_secs(86400),
            ignore.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_excludes_messages_older_than_max_age() {
        let messages = vec![at(0, "stale"), at(90000, "recent")];
        let now = Utc.timestamp_opt(90001, 0).unwrap();

        let texts = window(&[]).eligible_texts(&messages, now);
        assert_eq!(texts, vec!["recent"]);
    }

    #[test]
    fn test_age_exactly_max_age_is_excluded() {
        let messages = vec![at(0, "boundary")];
        let now = Utc.timestamp_opt(86400, 0).unwrap();

        assert!(window(&[]).eligible_texts(&messages, now).is_empty());
    }

    #[test]
    fn test_ignore_words_match_case_insensitively() {
        let messages = vec![
            at(100, "!Summary please"),
            at(101, "lunch at noon?"),
            at(102, "the !SUMMARY bot is here"),
        ];
        let now = Utc.timestamp_opt(200, 0).unwrap();

        let texts = window(&["!summary"]).eligible_texts(&messages, now);
        assert_eq!(texts, vec!["lunch at noon?"]);
    }

    #[test]
    fn test_order_is_preserved() {
        let messages = vec![at(1, "one"), at(2, "two"), at(3, "three")];
        let now = Utc.timestamp_opt(100, 0).unwrap();

        let texts = window(&[]).eligible_texts(&messages, now);
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let now = Utc.timestamp_opt(100, 0).unwrap();
        assert!(window(&["!summary"]).eligible_texts(&[], now).is_empty());
    }

    #[test]
    fn test_empty_ignore_words_are_dropped() {
        let messages = vec![at(100, "anything")];
        let now = Utc.timestamp_opt(200, 0).unwrap();

        // An empty pattern would match every message
        let texts = window(&[""]).eligible_texts(&messages, now);
        assert_eq!(texts, vec!["anything"]);
    }
}
