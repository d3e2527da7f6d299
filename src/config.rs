//! Service configuration
//!
//! Loaded from a TOML file with environment overrides (prefix `RELAY`,
//! `__` separator). Every field has a serde default so a bare config
//! file, or none at all, still yields a runnable service.

use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub relay: RelayConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Relay behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Phrase that requests a summary when a message starts with it
    #[serde(default = "default_trigger_phrase")]
    pub trigger_phrase: String,

    /// Exact-match command that clears a conversation's history
    #[serde(default = "default_reset_phrase")]
    pub reset_phrase: String,

    /// Maximum messages retained per conversation
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Maximum message age considered for a summary, in seconds
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    /// Substrings that disqualify a message from summarization.
    /// The trigger phrase is always included.
    #[serde(default)]
    pub ignore_words: Vec<String>,

    /// Allow free-form instructions after the trigger phrase
    #[serde(default)]
    pub custom_prompts: bool,

    /// Glob patterns over conversation ids for which custom prompts
    /// are allowed even when `custom_prompts` is off
    #[serde(default)]
    pub custom_prompt_allowlist: Vec<String>,

    /// Clear the consumed buffer after a successful summary
    #[serde(default = "default_clear_after_summary")]
    pub clear_after_summary: bool,

    /// Reply sent after a reset command
    #[serde(default = "default_reset_reply")]
    pub reset_reply: String,

    /// Reply sent when nothing qualifies for a summary
    #[serde(default = "default_empty_reply")]
    pub empty_reply: String,

    /// Reply sent when the language-model call fails
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,

    /// Reply sent on an unexpected internal failure
    #[serde(default = "default_apology_reply")]
    pub apology_reply: String,

    /// Text prepended to every delivered summary
    #[serde(default)]
    pub summary_preamble: String,
}

/// Text-generation collaborator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible chat completions endpoint
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// API key (env: RELAY__LLM__API_KEY)
    #[serde(default)]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Bound on generated output length
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(default = "default_llm_timeout_ms")]
    pub timeout_ms: u64,

    /// Instruction used when no custom instruction is supplied
    #[serde(default = "default_instruction")]
    pub default_instruction: String,
}

/// Webhook transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret for inbound signature verification.
    /// Verification is skipped when unset.
    #[serde(default)]
    pub secret: Option<SecretString>,

    /// Endpoint replies are posted back to
    #[serde(default = "default_reply_url")]
    pub reply_url: String,

    /// Bearer token for the reply endpoint
    #[serde(default)]
    pub reply_token: Option<SecretString>,

    /// Reply delivery timeout in milliseconds
    #[serde(default = "default_reply_timeout_ms")]
    pub reply_timeout_ms: u64,

    /// Maximum accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_trigger_phrase() -> String { "!summary".to_string() }
fn default_reset_phrase() -> String { "!reset".to_string() }
fn default_capacity() -> usize { 1000 }
fn default_retention_secs() -> u64 { 86400 }
fn default_clear_after_summary() -> bool { true }
fn default_reset_reply() -> String { "History cleared. Starting fresh.".to_string() }
fn default_empty_reply() -> String { "No messages in the last 24 hours to summarize.".to_string() }
fn default_fallback_reply() -> String {
    "Sorry, I couldn't put a summary together right now. Please try again later.".to_string()
}
fn default_apology_reply() -> String {
    "Sorry, something went wrong on my side. Please try again.".to_string()
}
fn default_llm_endpoint() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_model() -> String { "gpt-4o-mini".to_string() }
fn default_max_tokens() -> usize { 150 }
fn default_temperature() -> f32 { 0.7 }
fn default_llm_timeout_ms() -> u64 { 10000 }
fn default_instruction() -> String {
    "Summarize the following chat messages as short bullet points. \
     Keep only the important and memorable parts."
        .to_string()
}
fn default_reply_url() -> String { "http://localhost:9000/reply".to_string() }
fn default_reply_timeout_ms() -> u64 { 5000 }
fn default_max_body_bytes() -> usize { 1024 * 1024 }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            trigger_phrase: default_trigger_phrase(),
            reset_phrase: default_reset_phrase(),
            capacity: default_capacity(),
            retention_secs: default_retention_secs(),
            ignore_words: Vec::new(),
            custom_prompts: false,
            custom_prompt_allowlist: Vec::new(),
            clear_after_summary: default_clear_after_summary(),
            reset_reply: default_reset_reply(),
            empty_reply: default_empty_reply(),
            fallback_reply: default_fallback_reply(),
            apology_reply: default_apology_reply(),
            summary_preamble: String::new(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_ms: default_llm_timeout_ms(),
            default_instruction: default_instruction(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: None,
            reply_url: default_reply_url(),
            reply_token: None,
            reply_timeout_ms: default_reply_timeout_ms(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl Config {
    /// Load configuration from a TOML file with environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("RELAY").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load from `path` if it exists, otherwise defaults plus environment overrides
    pub fn load(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            let settings = config::Config::builder()
                .add_source(config::Environment::with_prefix("RELAY").separator("__"))
                .build()?;
            Ok(settings.try_deserialize()?)
        }
    }
}

impl RelayConfig {
    /// Retention window as a Duration
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    /// Ignore words with the trigger phrase always included
    pub fn effective_ignore_words(&self) -> Vec<String> {
        let mut words = self.ignore_words.clone();
        let trigger = self.trigger_phrase.to_lowercase();
        if !words.iter().any(|w| w.to_lowercase() == trigger) {
            words.push(self.trigger_phrase.clone());
        }
        words
    }
}

impl LlmConfig {
    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl WebhookConfig {
    /// Reply delivery timeout as a Duration
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }
}
