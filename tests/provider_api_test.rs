// Provider wire-format tests against a mocked HTTP endpoint

use serde_json::json;

use mcp_chat::providers::types::{Message, ProviderRequest};
use mcp_chat::providers::{ClaudeProvider, LlmProvider, OpenAIProvider};

#[tokio::test]
async fn test_openai_tool_calls_become_tool_use_blocks() {
    let mut server = mockito::Server::new_async().await;

    let body = json!({
        "id": "chatcmpl-1",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "add", "arguments": "{\"a\":2.0,\"b\":3.0}"}
                }]
            },
            "finish_reason": "tool_calls"
        }]
    });

    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let provider = OpenAIProvider::new("test-key".to_string())
        .unwrap()
        .with_base_url(server.url());

    let response = provider
        .send_message(&ProviderRequest::new(vec![Message::user_text(
            "add 2 and 3",
        )]))
        .await
        .unwrap();

    mock.assert_async().await;

    let uses = response.tool_uses();
    assert_eq!(uses.len(), 1);
    assert_eq!(uses[0].id, "call_1");
    assert_eq!(uses[0].name, "add");
    assert_eq!(uses[0].input["a"], 2.0);
    assert_eq!(response.stop_reason.as_deref(), Some("tool_calls"));
}

#[tokio::test]
async fn test_openai_text_response() {
    let mut server = mockito::Server::new_async().await;

    let body = json!({
        "id": "chatcmpl-2",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "2 + 3 = 5"},
            "finish_reason": "stop"
        }]
    });

    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let provider = OpenAIProvider::new("test-key".to_string())
        .unwrap()
        .with_base_url(server.url());

    let response = provider
        .send_message(&ProviderRequest::new(vec![Message::user_text(
            "add 2 and 3",
        )]))
        .await
        .unwrap();

    assert_eq!(response.text(), "2 + 3 = 5");
    assert!(response.tool_uses().is_empty());
}

#[tokio::test]
async fn test_openai_error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let provider = OpenAIProvider::new("test-key".to_string())
        .unwrap()
        .with_base_url(server.url());

    let err = provider
        .send_message(&ProviderRequest::new(vec![Message::user_text("hi")]))
        .await
        .unwrap_err();

    let message = format!("{}", err);
    assert!(message.contains("OpenAI API request failed"));
    assert!(message.contains("upstream exploded"));
}

#[tokio::test]
async fn test_claude_response_maps_natively() {
    let mut server = mockito::Server::new_async().await;

    let body = json!({
        "id": "msg_1",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-20250514",
        "stop_reason": "tool_use",
        "content": [
            {"type": "text", "text": "Let me compute that."},
            {"type": "tool_use", "id": "toolu_1", "name": "power",
             "input": {"base": 2.0, "exponent": 10.0}}
        ]
    });

    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-key")
        .match_header("anthropic-version", "2023-06-01")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let provider = ClaudeProvider::new("test-key".to_string())
        .unwrap()
        .with_base_url(format!("{}/v1/messages", server.url()));

    let response = provider
        .send_message(&ProviderRequest::new(vec![Message::user_text(
            "what is 2^10?",
        )]))
        .await
        .unwrap();

    mock.assert_async().await;

    assert_eq!(response.text(), "Let me compute that.");
    let uses = response.tool_uses();
    assert_eq!(uses.len(), 1);
    assert_eq!(uses[0].name, "power");
    assert_eq!(uses[0].input["exponent"], 10.0);
}

#[tokio::test]
async fn test_claude_error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(401)
        .with_body("{\"error\": \"invalid x-api-key\"}")
        .create_async()
        .await;

    let provider = ClaudeProvider::new("test-key".to_string())
        .unwrap()
        .with_base_url(format!("{}/v1/messages", server.url()));

    let err = provider
        .send_message(&ProviderRequest::new(vec![Message::user_text("hi")]))
        .await
        .unwrap_err();

    assert!(format!("{}", err).contains("Claude API request failed"));
}
