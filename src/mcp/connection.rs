// MCP connection wrapper for a single server

use super::config::{McpServerConfig, TransportType};
use anyhow::{Context, Result};
use rust_mcp_sdk::mcp_client::client_runtime::create_client;
use rust_mcp_sdk::mcp_client::{ClientHandler, ClientRuntime, McpClientOptions, ToMcpClientHandler};
use rust_mcp_sdk::schema::{
    CallToolRequestParams, ClientCapabilities, ContentBlock, Implementation,
    InitializeRequestParams, ProtocolVersion, Tool,
};
use rust_mcp_sdk::task_store::InMemoryTaskStore;
use rust_mcp_sdk::McpClient;
use rust_mcp_sdk::{ClientSseTransport, ClientSseTransportOptions, StdioTransport, TransportOptions};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Basic client handler (no custom behavior needed)
pub struct BasicClientHandler;

#[async_trait::async_trait]
impl ClientHandler for BasicClientHandler {}

/// A single MCP server connection
///
/// Holds the live client runtime plus the tool list cached at discovery;
/// the list is never refreshed mid-session.
pub struct McpConnection {
    /// Server name
    name: String,

    /// Live client runtime (keeps the transport alive)
    client: Arc<ClientRuntime>,

    /// Available tools (cached at connect time)
    tools: Vec<Tool>,

    /// Server version info
    server_info: Option<Implementation>,
}

impl McpConnection {
    /// Connect to an MCP server and discover its tools
    pub async fn connect(name: String, config: &McpServerConfig) -> Result<Self> {
        config
            .validate(&name)
            .context("Invalid MCP server configuration")?;

        let client = match config.transport {
            TransportType::Stdio => Self::start_stdio_client(&name, config).await?,
            TransportType::Http => Self::start_http_client(&name, config).await?,
        };

        let server_info = client.server_version();

        let tools = client
            .request_tool_list(None)
            .await
            .context("Failed to list tools")?
            .tools;

        tracing::info!(
            "Connected to MCP server '{}' with {} tools",
            name,
            tools.len()
        );

        Ok(Self {
            name,
            client,
            tools,
            server_info,
        })
    }

    /// Connect via STDIO transport (spawns the server process)
    async fn start_stdio_client(
        name: &str,
        config: &McpServerConfig,
    ) -> Result<Arc<ClientRuntime>> {
        let command = config
            .command
            .as_ref()
            .context("STDIO transport requires command")?;

        tracing::debug!(
            "Launching MCP server '{}': {} {}",
            name,
            command,
            config.args.join(" ")
        );

        let transport = StdioTransport::create_with_server_launch(
            command,
            config.args.clone(),
            None,
            TransportOptions::default(),
        )
        .map_err(|e| anyhow::anyhow!("Failed to create STDIO transport: {:?}", e))?;

        let client = create_client(McpClientOptions {
            client_details: client_details(),
            transport,
            handler: BasicClientHandler.to_mcp_client_handler(),
            task_store: Some(Arc::new(InMemoryTaskStore::new(None))),
            server_task_store: Some(Arc::new(InMemoryTaskStore::new(None))),
        });

        client
            .clone()
            .start()
            .await
            .context("Failed to start MCP client")?;

        Ok(client)
    }

    /// Connect via HTTP transport to a server URL
    async fn start_http_client(
        name: &str,
        config: &McpServerConfig,
    ) -> Result<Arc<ClientRuntime>> {
        let url = config.url.as_ref().context("HTTP transport requires url")?;

        tracing::debug!("Connecting to MCP server '{}' at {}", name, url);

        let transport = ClientSseTransport::new(url, ClientSseTransportOptions::default())
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP transport: {:?}", e))?;

        let client = create_client(McpClientOptions {
            client_details: client_details(),
            transport,
            handler: BasicClientHandler.to_mcp_client_handler(),
            task_store: Some(Arc::new(InMemoryTaskStore::new(None))),
            server_task_store: Some(Arc::new(InMemoryTaskStore::new(None))),
        });

        client
            .clone()
            .start()
            .await
            .context("Failed to start MCP client")?;

        Ok(client)
    }

    /// Invoke a tool on this server, coercing the result to text
    pub async fn call_tool(
        &self,
        tool_name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<String> {
        tracing::debug!("Calling tool '{}' on server '{}'", tool_name, self.name);

        let result = self
            .client
            .request_tool_call(CallToolRequestParams {
                name: tool_name.to_string(),
                arguments,
                meta: None,
                task: None,
            })
            .await
            .map_err(|e| anyhow::anyhow!("Tool call '{}' failed: {:?}", tool_name, e))?;

        let text: Vec<String> = result
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::TextContent(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect();

        if text.is_empty() {
            // Non-text result: fall back to its JSON rendering
            return Ok(serde_json::to_string(&result.content).unwrap_or_default());
        }

        Ok(text.join("\n"))
    }

    /// Get the list of available tools
    pub fn list_tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Get the server name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get server info
    pub fn server_info(&self) -> Option<&Implementation> {
        self.server_info.as_ref()
    }
}

fn client_details() -> InitializeRequestParams {
    InitializeRequestParams {
        protocol_version: ProtocolVersion::V2025_11_25.into(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "mcp-chat".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: Some("Chat CLI bridging LLM tool calls to MCP servers".to_string()),
            icons: vec![],
            title: None,
            website_url: None,
        },
        meta: None,
    }
}
