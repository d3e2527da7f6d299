use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use chat_relay::api::{build_router, AppState};
use chat_relay::config::Config;
use chat_relay::digest::{DigestDispatcher, LlmSummarizer, SummarizerConfig};
use chat_relay::history::ConversationStore;
use chat_relay::relay::{HttpReplySink, RelayService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_path =
        std::env::var("RELAY_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    let store = Arc::new(ConversationStore::new(config.relay.capacity));

    let summarizer = LlmSummarizer::new(SummarizerConfig::from(&config.llm))?;
    let dispatcher = DigestDispatcher::new(
        Arc::new(summarizer),
        config.llm.default_instruction.clone(),
    );

    let relay = Arc::new(RelayService::new(store, dispatcher, config.relay.clone()));
    let sink = Arc::new(HttpReplySink::new(&config.webhook)?);

    let state = AppState {
        relay,
        sink,
        webhook_secret: config.webhook.secret.clone(),
    };
    let router = build_router(state, config.webhook.max_body_bytes);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
