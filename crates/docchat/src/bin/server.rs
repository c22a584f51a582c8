//! Document Q&A server binary
//!
//! Run with: cargo run -p docchat --bin docchat-server

use std::sync::Arc;

use docchat::config::DocChatConfig;
use docchat::pipeline::RagPipeline;
use docchat::providers::AzureOpenAi;
use docchat::server::DocChatServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DocChatConfig::from_env()?;

    tracing::info!("configuration loaded");
    tracing::info!("  - endpoint: {}", config.azure.endpoint);
    tracing::info!("  - chat deployment: {}", config.azure.chat_deployment);
    tracing::info!(
        "  - embedding deployment: {}",
        config.azure.embedding_deployment
    );
    tracing::info!(
        "  - chunking: window {} / overlap {}",
        config.chunking.window,
        config.chunking.overlap
    );

    let azure = Arc::new(AzureOpenAi::new(config.azure.clone())?);
    let pipeline = Arc::new(RagPipeline::new(
        config.clone(),
        azure.clone(),
        azure,
    )?);

    let server = DocChatServer::new(config.server.clone(), pipeline);

    println!("docchat server starting");
    println!("  API:    http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!();
    println!("Endpoints:");
    println!("  POST /upload - Upload documents");
    println!("  POST /ask    - Ask questions");
    println!("  GET  /status - Readiness");
    println!();
    println!("Press Ctrl+C to stop");

    server.start().await?;

    Ok(())
}
