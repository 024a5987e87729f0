//! voicecast service entrypoint

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use voicecast::adapters::{PodcastClient, SpeechClient, SummaryClient, TelegramClient, TopicClient};
use voicecast::server::{routes, AppState};
use voicecast::{Config, GcsStore, IngestionController, MetadataExtractor};

/// voicecast - channel voice posts to published podcast episodes
#[derive(Parser, Debug)]
#[command(name = "voicecast")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the webhook server to
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind the webhook server to
    #[arg(long, env = "PORT", default_value = "8080")]
    port: u16,
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    // One shared HTTP client carries the explicit request timeout
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let store = Arc::new(GcsStore::new(
        config.storage_bucket.clone(),
        config.storage_access_token.clone(),
        client.clone(),
    ));
    let transcriber = Arc::new(SpeechClient::new(
        config.speech_api_key.clone(),
        client.clone(),
    ));
    let extractor = MetadataExtractor::new(
        Arc::new(SummaryClient::new(
            config.summary_api_key.clone(),
            client.clone(),
        )),
        Arc::new(TopicClient::new(
            config.topic_api_key.clone(),
            client.clone(),
        )),
    );
    let publisher = Arc::new(PodcastClient::new(
        config.podcast_client_id.clone(),
        config.podcast_client_secret.clone(),
        client.clone(),
    ));
    let messenger = Arc::new(TelegramClient::new(config.telegram_bot_token.clone(), client));

    let controller = Arc::new(IngestionController::new(
        store,
        transcriber,
        extractor,
        publisher,
        messenger,
        config.storage_bucket.clone(),
    ));
    let state = AppState::new(controller);

    info!(host = %args.host, port = args.port, "Starting voicecast webhook server");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes)
    })
    .bind((args.host.as_str(), args.port))?
    .run()
    .await
    .context("Webhook server failed")
}
