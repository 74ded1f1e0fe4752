// OpenAI Chat Completions provider
//
// Maps the unified (Claude-shaped) transcript into OpenAI's role-tagged
// message format: assistant tool calls travel inside the assistant message,
// and each tool result becomes its own `{"role":"tool"}` message.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::types::{ContentBlock, ProviderRequest, ProviderResponse};
use super::LlmProvider;

const OPENAI_API_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT_SECS: u64 = 60;

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
}

impl OpenAIProvider {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: OPENAI_API_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Override the endpoint URL (tests point this at a local mock)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Convert the unified request to OpenAI wire format
    fn to_openai_request(&self, request: &ProviderRequest) -> OpenAIRequest {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model.clone()
        };

        let mut messages: Vec<OpenAIMessage> = Vec::new();

        for msg in &request.messages {
            match msg.role.as_str() {
                "assistant" => {
                    // Text and tool_calls belong in one assistant message.
                    // Dropping tool_calls here would orphan the tool results
                    // that follow, which the API rejects.
                    let text: String = msg
                        .content
                        .iter()
                        .filter_map(|b| b.as_text())
                        .collect::<Vec<_>>()
                        .join("");

                    let tool_calls: Vec<OpenAIRequestToolCall> = msg
                        .content
                        .iter()
                        .filter_map(|b| match b {
                            ContentBlock::ToolUse { id, name, input } => {
                                let arguments = serde_json::to_string(input)
                                    .unwrap_or_else(|_| "{}".to_string());
                                Some(OpenAIRequestToolCall {
                                    id: id.clone(),
                                    tool_type: "function".to_string(),
                                    function: OpenAIRequestFunction {
                                        name: name.clone(),
                                        arguments,
                                    },
                                })
                            }
                            _ => None,
                        })
                        .collect();

                    messages.push(OpenAIMessage::Assistant {
                        role: "assistant".to_string(),
                        content: if text.is_empty() { None } else { Some(text) },
                        tool_calls: if tool_calls.is_empty() {
                            None
                        } else {
                            Some(tool_calls)
                        },
                    });
                }
                _ => {
                    // user messages: separate text from tool results
                    let mut text_parts: Vec<&str> = Vec::new();
                    let mut tool_results: Vec<(String, String)> = Vec::new();

                    for block in &msg.content {
                        match block {
                            ContentBlock::Text { text } => {
                                text_parts.push(text.as_str());
                            }
                            ContentBlock::ToolResult {
                                tool_use_id,
                                content,
                                ..
                            } => {
                                tool_results.push((tool_use_id.clone(), content.clone()));
                            }
                            ContentBlock::ToolUse { .. } => {}
                        }
                    }

                    if !text_parts.is_empty() {
                        let content = text_parts.join("\n");
                        if !content.trim().is_empty() {
                            messages.push(OpenAIMessage::Regular {
                                role: msg.role.clone(),
                                content,
                            });
                        }
                    }

                    // One tool message per result (the API requires separate messages)
                    for (tool_call_id, content) in tool_results {
                        messages.push(OpenAIMessage::Tool {
                            role: "tool".to_string(),
                            content: if content.trim().is_empty() {
                                "(no output)".to_string()
                            } else {
                                content
                            },
                            tool_call_id,
                        });
                    }
                }
            }
        }

        let tools = request.tools.as_ref().map(|tool_defs| {
            tool_defs
                .iter()
                .map(|tool| OpenAITool {
                    tool_type: "function".to_string(),
                    function: OpenAIFunction {
                        name: tool.name.clone(),
                        description: tool.description.clone(),
                        parameters: tool.input_schema.clone(),
                    },
                })
                .collect()
        });

        OpenAIRequest {
            model,
            messages,
            max_tokens: Some(request.max_tokens),
            temperature: request.temperature,
            tools,
        }
    }

    /// Convert OpenAI response to the unified format
    fn from_openai_response(&self, response: OpenAIResponse) -> Result<ProviderResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .context("OpenAI returned no choices in response")?;

        let mut content = Vec::new();

        if let Some(text) = choice.message.content {
            if !text.is_empty() {
                content.push(ContentBlock::Text { text });
            }
        }

        if let Some(tool_calls) = choice.message.tool_calls {
            for tool_call in tool_calls {
                if tool_call.tool_type == "function" {
                    let input = serde_json::from_str(&tool_call.function.arguments)
                        .unwrap_or(serde_json::json!({}));
                    content.push(ContentBlock::ToolUse {
                        id: tool_call.id,
                        name: tool_call.function.name,
                        input,
                    });
                }
            }
        }

        Ok(ProviderResponse {
            id: response.id,
            model: response.model,
            content,
            stop_reason: choice.finish_reason,
            role: choice.message.role,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let openai_request = self.to_openai_request(request);
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!("Sending request to OpenAI API: {:?}", openai_request);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "OpenAI API request failed\n\nStatus: {}\nBody: {}",
                status,
                error_body
            );
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        tracing::debug!("Received response: {:?}", openai_response);

        self.from_openai_response(openai_response)
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

#[derive(Debug, Clone, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAITool>>,
}

/// OpenAI message format — request side only (we never deserialize this)
///
/// The untagged variants are ordered so serde tries the most-specific first:
/// Tool (has tool_call_id), Assistant (has optional tool_calls), then Regular.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum OpenAIMessage {
    /// Tool result message (one per tool invocation)
    Tool {
        role: String, // "tool"
        content: String,
        tool_call_id: String,
    },
    /// Assistant message — may contain text, tool_calls, or both
    Assistant {
        role: String, // "assistant"
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<OpenAIRequestToolCall>>,
    },
    /// Plain user message
    Regular { role: String, content: String },
}

/// Tool call entry inside an assistant message (request format)
#[derive(Debug, Clone, Serialize)]
struct OpenAIRequestToolCall {
    id: String,
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAIRequestFunction,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAIRequestFunction {
    name: String,
    arguments: String, // JSON-encoded string
}

#[derive(Debug, Clone, Serialize)]
struct OpenAITool {
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAIFunction,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAIFunction {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    parameters: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponse {
    id: String,
    model: String,
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponseMessage {
    role: String,
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIToolCall {
    id: String,
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAIToolFunction,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIToolFunction {
    name: String,
    arguments: String, // JSON string
}

#[cfg(test)]
mod tests {
    use super::super::types::{Message, ToolDefinition, ToolResult};
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OpenAIProvider::new("test-key".to_string());
        assert!(provider.is_ok());
    }

    #[test]
    fn test_provider_name_and_model() {
        let provider = OpenAIProvider::new("test-key".to_string()).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.default_model(), "gpt-4o-mini");
    }

    #[test]
    fn test_assistant_tool_use_becomes_tool_calls() {
        let provider = OpenAIProvider::new("test-key".to_string()).unwrap();
        let request = ProviderRequest::new(vec![
            Message::user_text("add 2 and 3"),
            Message {
                role: "assistant".to_string(),
                content: vec![ContentBlock::ToolUse {
                    id: "call_1".to_string(),
                    name: "add".to_string(),
                    input: serde_json::json!({"a": 2.0, "b": 3.0}),
                }],
            },
            Message {
                role: "user".to_string(),
                content: vec![
                    ToolResult::success("call_1".to_string(), "5".to_string()).into_content_block(),
                ],
            },
        ]);

        let wire = provider.to_openai_request(&request);
        let json = serde_json::to_string(&wire).unwrap();

        assert!(json.contains("\"tool_calls\""));
        assert!(json.contains("\"tool_call_id\":\"call_1\""));
        assert!(json.contains("\"role\":\"tool\""));
    }

    #[test]
    fn test_tool_definitions_map_to_functions() {
        let provider = OpenAIProvider::new("test-key".to_string()).unwrap();
        let request = ProviderRequest::new(vec![Message::user_text("hi")]).with_tools(vec![
            ToolDefinition {
                name: "power".to_string(),
                description: Some("Raise base to the given exponent.".to_string()),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {"base": {"type": "number"}, "exponent": {"type": "number"}}
                }),
            },
        ]);

        let wire = provider.to_openai_request(&request);
        let json = serde_json::to_string(&wire).unwrap();

        assert!(json.contains("\"type\":\"function\""));
        assert!(json.contains("\"parameters\""));
        assert!(json.contains("\"power\""));
    }

    #[test]
    fn test_empty_tool_result_gets_placeholder() {
        let provider = OpenAIProvider::new("test-key".to_string()).unwrap();
        let request = ProviderRequest::new(vec![Message {
            role: "user".to_string(),
            content: vec![
                ToolResult::success("call_2".to_string(), "".to_string()).into_content_block(),
            ],
        }]);

        let json = serde_json::to_string(&provider.to_openai_request(&request)).unwrap();
        assert!(json.contains("(no output)"));
    }
}
