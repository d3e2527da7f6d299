//! Relay orchestration: classify, store, summarize, reply

pub mod reply;
pub mod service;

pub use reply::{HttpReplySink, ReplySink};
pub use service::RelayService;
