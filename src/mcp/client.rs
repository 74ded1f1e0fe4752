// MCP client coordinator - manages all server connections
//
// After discovery the tool routing table is fixed: a flat mapping from tool
// name to owning connection, looked up by exact name at dispatch time.

use super::config::McpServerConfig;
use super::connection::McpConnection;
use crate::agent::ToolDispatcher;
use crate::providers::types::ToolDefinition;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// MCP client that manages the session's server connections
pub struct McpToolClient {
    /// Connections in descriptor order
    connections: Vec<McpConnection>,

    /// Tool name -> index into `connections`
    routes: HashMap<String, usize>,
}

impl McpToolClient {
    /// Connect to every configured server and build the routing table.
    ///
    /// Descriptors keep CLI order so duplicate tool names resolve
    /// deterministically (first registration wins). A connection failure
    /// propagates and takes the process down.
    pub async fn connect_all(servers: &[(String, McpServerConfig)]) -> Result<Self> {
        let mut connections = Vec::new();

        for (name, config) in servers {
            let conn = McpConnection::connect(name.clone(), config)
                .await
                .with_context(|| format!("Failed to connect to MCP server '{}'", name))?;
            connections.push(conn);
        }

        let advertised: Vec<(String, Vec<String>)> = connections
            .iter()
            .map(|conn| {
                (
                    conn.name().to_string(),
                    conn.list_tools().iter().map(|t| t.name.clone()).collect(),
                )
            })
            .collect();

        let routes = build_routes(&advertised);

        Ok(Self {
            connections,
            routes,
        })
    }

    /// Names of the connected servers, in descriptor order
    pub fn server_names(&self) -> Vec<&str> {
        self.connections.iter().map(|c| c.name()).collect()
    }

    /// Number of routable tools across all servers
    pub fn tool_count(&self) -> usize {
        self.routes.len()
    }
}

#[async_trait]
impl ToolDispatcher for McpToolClient {
    /// The union of all advertised tools (shadowed duplicates excluded)
    fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions = Vec::new();

        for (idx, conn) in self.connections.iter().enumerate() {
            for tool in conn.list_tools() {
                if self.routes.get(&tool.name) != Some(&idx) {
                    continue; // shadowed by an earlier server
                }
                definitions.push(ToolDefinition {
                    name: tool.name.clone(),
                    description: tool.description.clone(),
                    input_schema: serde_json::to_value(&tool.input_schema)
                        .unwrap_or_else(|_| serde_json::json!({"type": "object"})),
                });
            }
        }

        definitions
    }

    fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    async fn dispatch(&self, name: &str, args: Value) -> Result<String> {
        let idx = self
            .routes
            .get(name)
            .with_context(|| format!("no connection serves tool '{}'", name))?;

        self.connections[*idx]
            .call_tool(name, args.as_object().cloned())
            .await
    }
}

/// Build the tool routing table from each server's advertised tool names
fn build_routes(advertised: &[(String, Vec<String>)]) -> HashMap<String, usize> {
    let mut routes = HashMap::new();

    for (idx, (server, tools)) in advertised.iter().enumerate() {
        for tool in tools {
            match routes.entry(tool.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
                Entry::Occupied(slot) => {
                    tracing::warn!(
                        "Tool '{}' from server '{}' shadowed by server '{}'",
                        tool,
                        server,
                        advertised[*slot.get()].0
                    );
                }
            }
        }
    }

    routes
}
