// CLI argument definitions

use clap::Parser;

/// Chat CLI that bridges LLM tool calling to MCP tool servers
#[derive(Debug, Parser)]
#[command(name = "mcp-chat", version)]
pub struct CliArgs {
    /// MCP server to connect, repeatable.
    /// Format: name:transport:command[:args] or name:transport:url
    #[arg(short = 's', long = "server", value_name = "NAME:TRANSPORT:REST")]
    pub server: Vec<String>,

    /// List the discovered tools and exit without calling any model
    #[arg(long = "list-tools")]
    pub list_tools: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_flag_is_repeatable() {
        let args = CliArgs::try_parse_from([
            "mcp-chat",
            "--server",
            "math:stdio:math-server",
            "-s",
            "weather:http:http://localhost:8000/mcp",
        ])
        .unwrap();

        assert_eq!(args.server.len(), 2);
        assert!(!args.list_tools);
    }

    #[test]
    fn test_list_tools_flag() {
        let args = CliArgs::try_parse_from(["mcp-chat", "--list-tools"]).unwrap();
        assert!(args.list_tools);
        assert!(args.server.is_empty());
    }
}
