// Standalone MCP server binary

use anyhow::{Context, Result};
use clap::Parser;
use posthog_mcp::tools::posthog_registry;
use posthog_mcp::{McpServer, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Values already in the environment win over .env
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries the protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "posthog_mcp=info,posthog_sdk=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let settings = Settings::parse();

    tracing::info!(
        "PostHog MCP Server v{} starting (region: {})",
        env!("CARGO_PKG_VERSION"),
        settings.region
    );
    if !settings.has_api_key() {
        tracing::warn!("PERSONAL_API_KEY is not set; PostHog tools will report an error");
    }

    let client = settings
        .posthog_client()
        .context("Failed to create PostHog client")?;
    let docs = settings
        .docs_client()
        .context("Failed to create docs client")?;

    let registry = posthog_registry(client, docs);
    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry);
    server.start().await?;

    Ok(())
}
