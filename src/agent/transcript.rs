// Conversation transcript for multi-turn interactions
//
// Append-only for the lifetime of the session; every model turn receives
// the full transcript. Discarded when the session ends.

use crate::providers::types::{ContentBlock, Message, ToolResult};

pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Append a user message
    pub fn push_user_text(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user_text(text));
    }

    /// Append the model's response blocks as an assistant message
    pub fn push_assistant(&mut self, content: Vec<ContentBlock>) {
        self.messages.push(Message {
            role: "assistant".to_string(),
            content,
        });
    }

    /// Append one user message carrying the results of a tool-dispatch round
    pub fn push_tool_results(&mut self, results: Vec<ToolResult>) {
        self.messages.push(Message {
            role: "user".to_string(),
            content: results
                .into_iter()
                .map(ToolResult::into_content_block)
                .collect(),
        });
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_creation() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.message_count(), 0);
    }

    #[test]
    fn test_push_user_and_assistant() {
        let mut transcript = Transcript::new();

        transcript.push_user_text("What is 2+2?");
        transcript.push_assistant(vec![ContentBlock::Text {
            text: "4".to_string(),
        }]);

        let messages = transcript.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content[0].as_text(), Some("What is 2+2?"));
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[1].content[0].as_text(), Some("4"));
    }

    #[test]
    fn test_tool_results_become_one_user_message() {
        let mut transcript = Transcript::new();

        transcript.push_tool_results(vec![
            ToolResult::success("call_1".to_string(), "5".to_string()),
            ToolResult::error("call_2".to_string(), "unknown tool: divide".to_string()),
        ]);

        let messages = transcript.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content.len(), 2);

        match &messages[0].content[1] {
            ContentBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => {
                assert_eq!(tool_use_id, "call_2");
                assert_eq!(content, "unknown tool: divide");
                assert_eq!(*is_error, Some(true));
            }
            other => panic!("expected tool_result block, got {:?}", other),
        }
    }

    #[test]
    fn test_messages_keep_append_order() {
        let mut transcript = Transcript::new();

        transcript.push_user_text("first");
        transcript.push_assistant(vec![ContentBlock::Text {
            text: "reply".to_string(),
        }]);
        transcript.push_user_text("second");

        let roles: Vec<&str> = transcript
            .messages()
            .iter()
            .map(|m| m.role.as_str())
            .collect();
        assert_eq!(roles, vec!["user", "assistant", "user"]);
    }
}
