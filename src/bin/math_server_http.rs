// Math MCP server over HTTP
//
// Runs standalone on a local port so clients can connect by URL:
//   mcp-chat --server math:http:http://127.0.0.1:8000/mcp

use anyhow::Result;
use mcp_chat::server::MathService;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use tracing_subscriber::EnvFilter;

const BIND_ADDRESS: &str = "127.0.0.1:8000";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let service = StreamableHttpService::new(
        || Ok(MathService::new()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);
    let listener = tokio::net::TcpListener::bind(BIND_ADDRESS).await?;

    tracing::info!("math server listening on http://{}/mcp", BIND_ADDRESS);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
