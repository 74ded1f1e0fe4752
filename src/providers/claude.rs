// Anthropic Messages API provider

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::types::{ContentBlock, Message, ProviderRequest, ProviderResponse, ToolDefinition};
use super::LlmProvider;

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const REQUEST_TIMEOUT_SECS: u64 = 60;

pub struct ClaudeProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
}

impl ClaudeProvider {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: CLAUDE_API_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Override the endpoint URL (tests point this at a local mock)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn to_claude_request(&self, request: &ProviderRequest) -> ClaudeRequest {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model.clone()
        };

        ClaudeRequest {
            model,
            max_tokens: request.max_tokens,
            messages: request.messages.clone(),
            tools: request.tools.clone(),
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let claude_request = self.to_claude_request(request);

        tracing::debug!("Sending request to Claude API: {:?}", claude_request);

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&claude_request)
            .send()
            .await
            .context("Failed to send request to Claude API")?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Claude API request failed\n\nStatus: {}\nBody: {}",
                status,
                error_body
            );
        }

        let claude_response: ClaudeResponse = response
            .json()
            .await
            .context("Failed to parse Claude API response")?;

        tracing::debug!("Received response: {:?}", claude_response);

        Ok(ProviderResponse {
            id: claude_response.id,
            model: claude_response.model,
            content: claude_response.content,
            stop_reason: claude_response.stop_reason,
            role: claude_response.role,
        })
    }

    fn name(&self) -> &str {
        "claude"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

/// Wire format: the transcript serializes natively for this API
#[derive(Debug, Clone, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct ClaudeResponse {
    id: String,
    role: String,
    content: Vec<ContentBlock>,
    model: String,
    stop_reason: Option<String>,
}
