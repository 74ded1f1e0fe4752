// Math MCP server over stdio
//
// Spawned by the chat client (or any MCP host); stdout carries the
// protocol, so all logging goes to stderr.

use anyhow::Result;
use mcp_chat::server::MathService;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let service = MathService::new().serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
