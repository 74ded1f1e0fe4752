// Agent loop: relays tool calls between the model and the tool servers
//
// One user turn runs ModelTurn -> (ToolDispatch -> ModelTurn)* until the
// model answers without requesting tools. Tool failures never abort the
// loop; they are absorbed into error-text results the model can react to.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::providers::types::{ProviderRequest, ToolDefinition, ToolResult};
use crate::providers::LlmProvider;

pub mod transcript;

pub use transcript::Transcript;

/// Upper bound on ModelTurn <-> ToolDispatch rounds within one user turn.
/// Hitting it ends the turn with a diagnostic answer instead of looping
/// until the model decides to stop.
pub const MAX_TOOL_ROUNDS: usize = 25;

/// Invocable tool collection, bound by name at dispatch time
///
/// Constructed once after discovery and treated as immutable for the
/// session. `McpToolClient` is the production implementation; tests use
/// scripted stubs.
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    /// Definitions of every dispatchable tool, as advertised to the model
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// Whether a tool with exactly this name was discovered
    fn contains(&self, name: &str) -> bool;

    /// Invoke a tool and coerce its result to text
    async fn dispatch(&self, name: &str, args: Value) -> Result<String>;
}

/// A chat session: one provider, one tool set, one growing transcript
pub struct AgentSession<'a> {
    provider: &'a dyn LlmProvider,
    tools: &'a dyn ToolDispatcher,
    transcript: Transcript,
}

impl<'a> AgentSession<'a> {
    pub fn new(provider: &'a dyn LlmProvider, tools: &'a dyn ToolDispatcher) -> Self {
        Self {
            provider,
            tools,
            transcript: Transcript::new(),
        }
    }

    /// Run one user turn to its final text response.
    ///
    /// Provider errors propagate to the caller; tool-level problems are fed
    /// back to the model as error results and the loop continues.
    pub async fn run_turn(&mut self, input: &str) -> Result<String> {
        self.transcript.push_user_text(input);

        let definitions = self.tools.definitions();

        for round in 0..MAX_TOOL_ROUNDS {
            let mut request = ProviderRequest::new(self.transcript.messages().to_vec())
                .with_temperature(0.0);
            if !definitions.is_empty() {
                request = request.with_tools(definitions.clone());
            }

            let response = self.provider.send_message(&request).await?;

            let tool_uses = response.tool_uses();
            let final_text = response.text();
            self.transcript.push_assistant(response.content);

            if tool_uses.is_empty() {
                return Ok(final_text);
            }

            tracing::debug!(
                "Round {}: dispatching {} tool call(s)",
                round + 1,
                tool_uses.len()
            );

            // Strictly sequential dispatch, in the order the model asked
            let mut results = Vec::new();
            for tool_use in &tool_uses {
                let result = if !self.tools.contains(&tool_use.name) {
                    ToolResult::error(
                        tool_use.id.clone(),
                        format!("unknown tool: {}", tool_use.name),
                    )
                } else {
                    match self
                        .tools
                        .dispatch(&tool_use.name, tool_use.input.clone())
                        .await
                    {
                        Ok(output) => ToolResult::success(tool_use.id.clone(), output),
                        Err(e) => ToolResult::error(
                            tool_use.id.clone(),
                            format!("tool execution error: {}", e),
                        ),
                    }
                };
                results.push(result);
            }

            self.transcript.push_tool_results(results);
        }

        tracing::warn!(
            "Turn exceeded {} tool rounds without a final answer",
            MAX_TOOL_ROUNDS
        );
        Ok(format!(
            "(stopped after {} tool rounds without a final answer)",
            MAX_TOOL_ROUNDS
        ))
    }

    /// The session transcript so far
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}
