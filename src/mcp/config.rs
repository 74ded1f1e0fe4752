// MCP server descriptors and `--server` argument parsing

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Connection descriptor for one MCP server
///
/// Built once at startup from CLI input; immutable afterwards. Exactly one
/// of `command`(+`args`) or `url` is populated, selected by `transport`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServerConfig {
    /// Transport type (stdio or http)
    pub transport: TransportType,

    /// Command to execute (for STDIO transport)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Command arguments (for STDIO transport)
    #[serde(default)]
    pub args: Vec<String>,

    /// URL (for HTTP transport)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Transport type for MCP servers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// Standard I/O transport (local process)
    Stdio,
    /// HTTP transport (remote server URL)
    Http,
}

/// Errors from parsing a `--server` value
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("invalid --server value '{0}': expected name:transport:command[:args] or name:transport:url")]
    Malformed(String),

    #[error("unsupported transport '{0}': expected 'stdio' or 'http'")]
    UnsupportedTransport(String),
}

impl McpServerConfig {
    /// Parse a `name:transport:rest` spec into a named descriptor.
    ///
    /// The string splits at the first two colons only, so URLs (and stdio
    /// argument paths) keep any colons of their own. For `stdio`, `rest`
    /// splits once more into the command and a single-element argument list.
    pub fn parse_spec(spec: &str) -> Result<(String, McpServerConfig), SpecError> {
        let mut parts = spec.splitn(3, ':');
        let name = parts.next().filter(|s| !s.is_empty());
        let transport = parts.next();
        let rest = parts.next();

        let (name, transport, rest) = match (name, transport, rest) {
            (Some(name), Some(transport), Some(rest)) => (name, transport, rest),
            _ => return Err(SpecError::Malformed(spec.to_string())),
        };

        let config = match transport {
            "stdio" => match rest.split_once(':') {
                Some((command, arg)) => McpServerConfig {
                    transport: TransportType::Stdio,
                    command: Some(command.to_string()),
                    args: vec![arg.to_string()],
                    url: None,
                },
                None => McpServerConfig {
                    transport: TransportType::Stdio,
                    command: Some(rest.to_string()),
                    args: Vec::new(),
                    url: None,
                },
            },
            "http" => McpServerConfig {
                transport: TransportType::Http,
                command: None,
                args: Vec::new(),
                url: Some(rest.to_string()),
            },
            other => return Err(SpecError::UnsupportedTransport(other.to_string())),
        };

        Ok((name.to_string(), config))
    }

    /// Validate the one-of command/url invariant
    pub fn validate(&self, name: &str) -> anyhow::Result<()> {
        match self.transport {
            TransportType::Stdio => {
                if self.command.is_none() {
                    anyhow::bail!(
                        "MCP server '{}': STDIO transport requires 'command' field",
                        name
                    );
                }
            }
            TransportType::Http => {
                if self.url.is_none() {
                    anyhow::bail!("MCP server '{}': HTTP transport requires 'url' field", name);
                }
            }
        }
        Ok(())
    }
}

/// Descriptor for the bundled math server, used when no `--server` is given.
///
/// The server binary is expected next to the client executable; a missing
/// binary is a configuration error, reported with a hint.
pub fn default_math_server() -> anyhow::Result<(String, McpServerConfig)> {
    use anyhow::Context;

    let exe = std::env::current_exe().context("Failed to locate the current executable")?;
    let server = exe
        .parent()
        .map(|dir| dir.join(format!("math-server{}", std::env::consts::EXE_SUFFIX)))
        .context("Failed to determine the executable directory")?;

    if !server.exists() {
        anyhow::bail!(
            "bundled math server not found at {}\n\
             pass --server to point at a tool server, for example:\n\
             --server math:stdio:target/debug/math-server",
            server.display()
        );
    }

    Ok((
        "math".to_string(),
        McpServerConfig {
            transport: TransportType::Stdio,
            command: Some(server.to_string_lossy().into_owned()),
            args: Vec::new(),
            url: None,
        },
    ))
}
