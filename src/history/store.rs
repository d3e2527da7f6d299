//! Bounded per-conversation message store

use super::models::Message;
use crate::metrics::METRICS;
use dashmap::DashMap;
use std::collections::VecDeque;
use tracing::debug;

/// In-memory store of bounded, insertion-ordered message buffers,
/// one per conversation, created lazily on first append.
///
/// Access to a given conversation's buffer is serialized by the map's
/// per-shard locking: `append` and `clear` hold the entry lock for the
/// duration of the mutation, and `snapshot` clones the buffer out so no
/// lock is held while callers work with the result.
pub struct ConversationStore {
    buffers: DashMap<String, VecDeque<Message>>,
    capacity: usize,
}

impl ConversationStore {
    /// Create a store with the given per-conversation capacity.
    /// A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffers: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append a message to the tail of its conversation's buffer,
    /// evicting the oldest entry if the buffer is at capacity.
    pub fn append(&self, message: Message) {
        let mut buffer = self
            .buffers
            .entry(message.conversation_id.clone())
            .or_default();

        if buffer.len() >= self.capacity {
            buffer.pop_front();
            METRICS.record_eviction();
        }
        buffer.push_back(message);
    }

    /// Empty the buffer for a conversation. No-op if none exists.
    pub fn clear(&self, conversation_id: &str) {
        if let Some(mut buffer) = self.buffers.get_mut(conversation_id) {
            let dropped = buffer.len();
            buffer.clear();
            METRICS.record_reset();
            debug!("Cleared {} messages for conversation", dropped);
        }
    }

    /// Current ordered messages for a conversation, oldest first.
    /// Empty if the conversation is unknown.
    pub fn snapshot(&self, conversation_id: &str) -> Vec<Message> {
        self.buffers
            .get(conversation_id)
            .map(|buffer| buffer.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of messages currently held for a conversation
    pub fn len(&self, conversation_id: &str) -> usize {
        self.buffers
            .get(conversation_id)
            .map(|buffer| buffer.len())
            .unwrap_or(0)
    }

    /// Number of conversations with a buffer (cleared buffers included)
    pub fn conversation_count(&self) -> usize {
        self.buffers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(conversation: &str, text: &str) -> Message {
        Message::now("author", conversation, text)
    }

    #[test]
    fn test_append_and_snapshot() {
        let store = ConversationStore::new(10);
        store.append(msg("c1", "first"));
        store.append(msg("c1", "second"));

        let snapshot = store.snapshot("c1");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].text, "first");
        assert_eq!(snapshot[1].text, "second");
    }

    #[test]
    fn test_snapshot_unknown_conversation_is_empty() {
        let store = ConversationStore::new(10);
        assert!(store.snapshot("nope").is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let store = ConversationStore::new(3);
        for text in ["A", "B", "C", "D"] {
            store.append(msg("c1", text));
        }

        let texts: Vec<_> = store
            .snapshot("c1")
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["B", "C", "D"]);
    }

    #[test]
    fn test_buffer_never_exceeds_capacity() {
        let store = ConversationStore::new(5);
        for i in 0..50 {
            store.append(msg("c1", &format!("m{}", i)));
            assert!(store.len("c1") <= 5);
        }

        let texts: Vec<_> = store
            .snapshot("c1")
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["m45", "m46", "m47", "m48", "m49"]);
    }

    #[test]
    fn test_clear_empties_until_next_append() {
        let store = ConversationStore::new(10);
        for i in 0..5 {
            store.append(msg("c1", &format!("m{}", i)));
        }

        store.clear("c1");
        assert!(store.snapshot("c1").is_empty());
        assert!(store.snapshot("c1").is_empty());

        store.append(msg("c1", "fresh"));
        assert_eq!(store.snapshot("c1").len(), 1);
    }

    #[test]
    fn test_clear_unknown_conversation_is_noop() {
        let store = ConversationStore::new(10);
        store.clear("nope");
        assert_eq!(store.conversation_count(), 0);
    }

    #[test]
    fn test_conversations_are_isolated() {
        let store = ConversationStore::new(2);
        store.append(msg("c1", "one"));
        store.append(msg("c2", "two"));
        store.append(msg("c2", "three"));
        store.append(msg("c2", "four"));

        assert_eq!(store.len("c1"), 1);
        let c2: Vec<_> = store.snapshot("c2").into_iter().map(|m| m.text).collect();
        assert_eq!(c2, vec!["three", "four"]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_keep_capacity_invariant() {
        use std::sync::Arc;

        let store = Arc::new(ConversationStore::new(100));
        let mut handles = Vec::new();

        for task in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..200 {
                    store.append(Message::now(
                        format!("u{}", task),
                        "shared",
                        format!("t{}-m{}", task, i),
                    ));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len("shared"), 100);
    }
}
