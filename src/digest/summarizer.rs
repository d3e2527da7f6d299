//! LLM-backed text generation for chat summaries

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::LlmConfig;

/// Text-generation collaborator seam
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Generate text for a prompt with bounded output length and a
    /// fixed sampling temperature.
    async fn generate(&self, prompt: &str) -> Result<String, SummarizerError>;
}

/// Configuration for the LLM summarizer
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub endpoint: String,
    pub api_key: Option<SecretString>,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 150,
            temperature: 0.7,
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&LlmConfig> for SummarizerConfig {
    fn from(cfg: &LlmConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
            timeout: cfg.timeout(),
        }
    }
}

/// Summarizer using an OpenAI-compatible chat completions API.
///
/// Makes exactly one attempt per call; the timeout is the only bound.
pub struct LlmSummarizer {
    client: Client,
    config: SummarizerConfig,
}

impl LlmSummarizer {
    /// Create a new LLM summarizer
    pub fn new(config: SummarizerConfig) -> Result<Self, SummarizerError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SummarizerError::InitializationError(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn generate(&self, prompt: &str) -> Result<String, SummarizerError> {
        debug!(
            "Dispatching generation request: model={}, max_tokens={}",
            self.config.model, self.config.max_tokens
        );

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        };

        let mut req = self.client.post(&self.config.endpoint).json(&request);
        if let Some(ref api_key) = self.config.api_key {
            req = req.header(
                "Authorization",
                format!("Bearer {}", api_key.expose_secret()),
            );
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                SummarizerError::Timeout
            } else {
                SummarizerError::NetworkError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| SummarizerError::ApiError(format!("Failed to parse response: {}", e)))?;

        let choice = parsed
            .choices
            .first()
            .ok_or_else(|| SummarizerError::ApiError("No choices in response".to_string()))?;

        Ok(choice.message.content.trim().to_string())
    }
}

/// Summarizer errors
#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    #[error("Initialization error: {0}")]
    InitializationError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out")]
    Timeout,
}

// OpenAI-compatible API types
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
