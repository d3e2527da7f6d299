//! Router assembly

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::api::handlers::{self, AppState};

/// Build the service router with tracing and a request body limit
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/callback", post(handlers::receive_webhook))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
