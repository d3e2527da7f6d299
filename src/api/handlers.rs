//! HTTP handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::models::{error_codes, ApiError, EventKind, WebhookEnvelope};
use crate::api::signature::verify_signature;
use crate::metrics::METRICS;
use crate::relay::{RelayService, ReplySink};

/// Header carrying the hex HMAC-SHA256 of the request body
pub const SIGNATURE_HEADER: &str = "X-Relay-Signature";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
    pub sink: Arc<dyn ReplySink>,
    pub webhook_secret: Option<SecretString>,
}

/// Receive a webhook delivery
///
/// POST /callback
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let delivery_id = Uuid::new_v4();
    debug!("Received webhook delivery {} ({} bytes)", delivery_id, body.len());

    if let Some(ref secret) = state.webhook_secret {
        let header_value = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !verify_signature(secret.expose_secret(), &body, header_value) {
            METRICS.record_rejection("signature");
            warn!("Rejected delivery {}: invalid signature", delivery_id);
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiError::new(
                    error_codes::SIGNATURE_INVALID,
                    "Webhook signature verification failed",
                )),
            ));
        }
    }

    let envelope: WebhookEnvelope = serde_json::from_slice(&body).map_err(|e| {
        METRICS.record_rejection("malformed");
        warn!("Rejected delivery {}: malformed payload", delivery_id);
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(error_codes::VALIDATION_ERROR, e.to_string())),
        )
    })?;

    info!(
        "Processing delivery {} with {} events",
        delivery_id,
        envelope.events.len()
    );

    for event in envelope.events {
        METRICS.record_event(event.kind.label());

        // Only text messages reach the core; membership and other
        // event kinds are counted and dropped.
        if event.kind != EventKind::Message {
            continue;
        }
        let Some(text) = event.text else {
            continue;
        };

        let reply = state
            .relay
            .handle_message(&event.conversation_id, &event.author_id, &text, Utc::now())
            .await;

        if let Some(reply_text) = reply {
            match state.sink.send(&event.conversation_id, &reply_text).await {
                Ok(()) => METRICS.record_reply(true),
                Err(e) => {
                    METRICS.record_reply(false);
                    warn!("Reply delivery failed: {}", e);
                }
            }
        }
    }

    Ok(StatusCode::OK)
}

/// Readiness probe
///
/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Prometheus metrics exposition
///
/// GET /metrics
pub async fn metrics() -> String {
    METRICS.export_prometheus()
}
