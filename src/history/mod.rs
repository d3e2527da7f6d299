//! Per-conversation message history

pub mod models;
pub mod store;
pub mod window;

pub use models::Message;
pub use store::ConversationStore;
pub use window::RetentionWindow;
