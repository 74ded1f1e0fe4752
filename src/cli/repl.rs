// Interactive chat loop

use anyhow::Result;
use std::io::{self, Write};

use crate::agent::{AgentSession, ToolDispatcher};
use crate::providers::LlmProvider;

pub struct ChatRepl<'a> {
    session: AgentSession<'a>,
}

impl<'a> ChatRepl<'a> {
    pub fn new(provider: &'a dyn LlmProvider, tools: &'a dyn ToolDispatcher) -> Self {
        Self {
            session: AgentSession::new(provider, tools),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("MCP chat client ready. Ask a question (the model can call the discovered tools).");
        println!("Type quit to exit.");
        println!();

        loop {
            let line = match read_input("you: ").await? {
                Some(line) => line,
                None => break, // end of input
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if is_quit_token(input) {
                break;
            }

            // A failed model call ends the turn, not the session
            match self.session.run_turn(input).await {
                Ok(response) => {
                    println!("\nassistant: {}\n", response);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                }
            }
        }

        Ok(())
    }
}

/// Session-ending input tokens, case-insensitive
fn is_quit_token(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "quit" | "exit" | "q")
}

/// Read one line from stdin without stalling the runtime.
///
/// Returns `None` at end of input. The blocking read runs on the blocking
/// thread pool; model and tool calls stay on the async runtime.
async fn read_input(prompt: &str) -> Result<Option<String>> {
    let prompt = prompt.to_string();

    tokio::task::spawn_blocking(move || -> Result<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes = io::stdin().read_line(&mut line)?;
        if bytes == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_tokens_any_case() {
        assert!(is_quit_token("quit"));
        assert!(is_quit_token("QUIT"));
        assert!(is_quit_token("Exit"));
        assert!(is_quit_token("q"));
        assert!(is_quit_token("Q"));
    }

    #[test]
    fn test_regular_input_is_not_quit() {
        assert!(!is_quit_token("quite"));
        assert!(!is_quit_token("what is 2 + 2?"));
        assert!(!is_quit_token("exit now"));
    }
}
