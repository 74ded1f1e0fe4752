// MCP (Model Context Protocol) integration
//
// Connects the chat client to external tool servers and routes model-issued
// tool calls to the server that advertised the tool.
//
// Supported transports:
// - STDIO: launch a local server process and talk over its stdin/stdout
// - HTTP: connect to a URL exposing the same tool-serving protocol

pub mod client;
pub mod config;
pub mod connection;

pub use client::McpToolClient;
pub use config::{McpServerConfig, SpecError, TransportType};
pub use connection::McpConnection;
