//! Outgoing reply channel

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

use crate::config::WebhookConfig;
use crate::error::{RelayError, Result};

/// Delivery seam for replies back into a conversation.
///
/// Fire-and-forget from the relay's perspective: callers log failures
/// and move on, there is no delivery feedback loop into the core.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, conversation_id: &str, text: &str) -> Result<()>;
}

#[derive(Serialize)]
struct ReplyBody<'a> {
    conversation_id: &'a str,
    text: &'a str,
}

/// Reply sink posting JSON to the platform's reply endpoint
pub struct HttpReplySink {
    client: Client,
    reply_url: String,
    token: Option<SecretString>,
}

impl HttpReplySink {
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.reply_timeout())
            .build()
            .map_err(|e| RelayError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            reply_url: config.reply_url.clone(),
            token: config.reply_token.clone(),
        })
    }
}

#[async_trait]
impl ReplySink for HttpReplySink {
    async fn send(&self, conversation_id: &str, text: &str) -> Result<()> {
        debug!("Delivering reply ({} chars)", text.len());

        let body = ReplyBody { conversation_id, text };
        let mut req = self.client.post(&self.reply_url).json(&body);
        if let Some(ref token) = self.token {
            req = req.header("Authorization", format!("Bearer {}", token.expose_secret()));
        }

        let response = req
            .send()
            .await
            .map_err(|e| RelayError::Internal(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RelayError::Internal(format!(
                "Reply endpoint returned HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }
}
