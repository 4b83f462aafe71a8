//! mcp-return-check server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use returncheck_client::RegistryClient;
use returncheck_core::{AppConfig, LookupEngine, open_store};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    let store = open_store(config.cache_backend, &config.cache_path)
        .await
        .with_context(|| format!("opening cache at {}", config.cache_path.display()))?;
    let registry = RegistryClient::from_app_config(&config).context("building registry client")?;
    let engine = LookupEngine::new(store, Arc::new(registry));

    tracing::info!(registry = %config.registry_url, "Starting mcp-return-check server on stdio transport");

    let handler = handler::ReturnCheckServer::new(engine);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
