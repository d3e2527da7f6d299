//! Webhook chat relay with rolling per-conversation history and
//! LLM-backed summaries.
//!
//! Inbound platform events arrive on the webhook callback, each
//! conversation keeps a bounded FIFO of recent messages, and a
//! configured trigger phrase asks the text-generation collaborator for
//! a condensed recap that is relayed back into the conversation.

pub mod api;
pub mod config;
pub mod digest;
pub mod error;
pub mod history;
pub mod metrics;
pub mod relay;
pub mod trigger;
