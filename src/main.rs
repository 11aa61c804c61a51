mod config;
mod console;
mod core;
mod models;
mod services;

use candle_core::Device;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::services::{ChatClient, EntityExtractor, SentimentAnalyzer};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Review Lens...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    if settings.openai.api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set; sentiment requests will fail inline");
    }

    // Initialize the chat client and sentiment analyzer
    let chat = ChatClient::new(
        settings.openai.base_url,
        settings.openai.api_key,
        settings.openai.model,
    );
    let analyzer = SentimentAnalyzer::new(chat);

    info!("Chat client initialized");

    // Initialize the entity extractor; the model itself loads on first use
    let extractor = EntityExtractor::new(settings.ner.model_id, Device::Cpu);

    info!("Entity extractor initialized (model: {})", extractor.model_id());

    console::run(&analyzer, &extractor).await
}
