//! HTTP surface: webhook callback, health probe, metrics

pub mod handlers;
pub mod models;
pub mod routes;
pub mod signature;

pub use handlers::AppState;
pub use routes::build_router;
