//! Data models for message history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single chat message as received from the webhook.
///
/// Immutable once created; leaves the store only through capacity
/// eviction or an explicit reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub author_id: String,
    pub conversation_id: String,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        author_id: impl Into<String>,
        conversation_id: impl Into<String>,
        text: impl Into<String>,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            conversation_id: conversation_id.into(),
            text: text.into(),
            received_at,
        }
    }

    /// Create a message stamped with the current time
    pub fn now(
        author_id: impl Into<String>,
        conversation_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(author_id, conversation_id, text, Utc::now())
    }

    /// Age of the message relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.received_at
    }
}
