// Hosted model providers
//
// An abstraction over the two model backends the client can talk to
// (Anthropic and OpenAI), so the agent loop works with a single interface.

use anyhow::Result;
use async_trait::async_trait;

pub mod claude;
pub mod factory;
pub mod openai;
pub mod types;

pub use claude::ClaudeProvider;
pub use factory::{resolve_session_mode, SessionMode};
pub use openai::OpenAIProvider;
pub use types::{ProviderRequest, ProviderResponse};

/// Trait for hosted model providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the transcript and wait for the complete response
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Get the provider name (e.g., "claude", "openai")
    fn name(&self) -> &str;

    /// Get the default model for this provider
    fn default_model(&self) -> &str;

    /// Check if the provider supports tool/function calling
    fn supports_tools(&self) -> bool {
        true
    }
}
