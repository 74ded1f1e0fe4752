// mcp-chat - chat CLI bridging LLM tool calls to MCP servers
// Main entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mcp_chat::agent::ToolDispatcher;
use mcp_chat::cli::{ChatRepl, CliArgs};
use mcp_chat::mcp::{config, McpServerConfig, McpToolClient};
use mcp_chat::providers::{resolve_session_mode, SessionMode};

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so chat output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    // Build connection descriptors once; immutable for the session
    let servers: Vec<(String, McpServerConfig)> = if args.server.is_empty() {
        vec![config::default_math_server()?]
    } else {
        args.server
            .iter()
            .map(|spec| McpServerConfig::parse_spec(spec))
            .collect::<Result<_, _>>()?
    };

    let tools = McpToolClient::connect_all(&servers).await?;

    if args.list_tools {
        print_tool_listing(&tools);
        return Ok(());
    }

    // Credentials are resolved exactly once, before the loop starts
    match resolve_session_mode()? {
        SessionMode::Chat(provider) => {
            let mut repl = ChatRepl::new(provider.as_ref(), &tools);
            repl.run().await
        }
        SessionMode::ListOnly => {
            eprintln!("Set OPENAI_API_KEY or ANTHROPIC_API_KEY to chat; listing tools instead.");
            print_tool_listing(&tools);
            Ok(())
        }
    }
}

fn print_tool_listing(tools: &McpToolClient) {
    println!("Connected MCP servers: {}", tools.server_names().join(", "));
    println!("Available tools:");
    for def in tools.definitions() {
        println!(
            "  - {}: {}",
            def.name,
            def.description.as_deref().unwrap_or("(no description)")
        );
    }
}
