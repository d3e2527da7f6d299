//! Webhook payload models

use serde::{Deserialize, Serialize};

/// Kind of inbound event delivered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Message,
    Join,
    Leave,
    #[serde(other)]
    Other,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Message => "message",
            EventKind::Join => "join",
            EventKind::Leave => "leave",
            EventKind::Other => "other",
        }
    }
}

/// One verified, structured event from the platform webhook
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InboundEvent {
    pub kind: EventKind,
    pub conversation_id: String,
    pub author_id: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// A webhook delivery wrapping a batch of events
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookEnvelope {
    pub events: Vec<InboundEvent>,
}

/// Structured API error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Error codes used by the HTTP surface
pub mod error_codes {
    pub const SIGNATURE_INVALID: &str = "SIGNATURE_INVALID";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_deserializes() {
        let body = r#"{
            "events": [
                {"kind": "message", "conversation_id": "c1", "author_id": "u1", "text": "hi"},
                {"kind": "join", "conversation_id": "c1", "author_id": "u2"}
            ]
        }"#;

        let envelope: WebhookEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.events.len(), 2);
        assert_eq!(envelope.events[0].kind, EventKind::Message);
        assert_eq!(envelope.events[0].text.as_deref(), Some("hi"));
        assert_eq!(envelope.events[1].kind, EventKind::Join);
        assert!(envelope.events[1].text.is_none());
    }

    #[test]
    fn test_unknown_event_kind_maps_to_other() {
        let body = r#"{"kind": "sticker", "conversation_id": "c1", "author_id": "u1"}"#;
        let event: InboundEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.kind, EventKind::Other);
    }
}
