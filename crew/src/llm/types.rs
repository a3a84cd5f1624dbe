//! LLM request/response types
//!
//! Provider-agnostic shapes for one chat completion call. The OpenAI-compatible
//! client translates these to and from its wire format.

use serde::Serialize;
use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt (the agent's persona)
    pub system_prompt: String,

    /// Conversation so far (instruction, tool calls, tool results)
    pub messages: Vec<Message>,

    /// Tools the model may call during this request
    pub tools: Vec<ToolDefinition>,

    /// Max tokens for response (capped by config)
    pub max_tokens: u32,

    /// Sampling temperature; `None` leaves the client default in place
    pub temperature: Option<f32>,
}

/// One turn of the conversation sent to the model
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    fn new(role: Role, content: MessageContent) -> Self {
        debug!(?role, "Message::new: called");
        Self { role, content }
    }

    /// Plain-text user turn (a stage instruction or the final-answer nudge)
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, MessageContent::Text(text.into()))
    }

    /// User turn carrying tool results
    pub fn user_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self::new(Role::User, MessageContent::Blocks(blocks))
    }

    /// Assistant turn echoing the model's text and tool calls
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self::new(Role::Assistant, MessageContent::Blocks(blocks))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Blocks(_) => None,
        }
    }
}

/// Structured piece of a tool-calling turn
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        is_error: bool,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Output of one tool call, keyed by the call id the model assigned
    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>, is_error: bool) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error,
        }
    }
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Plain text response with no tool calls
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: vec![],
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: serde_json::Value,
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
}

impl StopReason {
    /// Parse from an OpenAI-style `finish_reason`
    pub fn from_finish_reason(s: Option<&str>) -> Self {
        debug!(?s, "StopReason::from_finish_reason: called");
        match s {
            Some("tool_calls") => StopReason::ToolUse,
            Some("length") => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        }
    }
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Accumulate another call's usage into this one
    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// Tool definition for the LLM
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: serde_json::Value) -> Self {
        let name = name.into();
        let description = description.into();
        debug!(%name, "ToolDefinition::new: called");
        Self {
            name,
            description,
            input_schema,
        }
    }

    /// Convert to the OpenAI `tools` entry format
    pub fn to_openai_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.input_schema,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let instruction = Message::user("Research the market");
        assert_eq!(instruction.role, Role::User);
        assert_eq!(instruction.content.as_text(), Some("Research the market"));

        let results = Message::user_blocks(vec![ContentBlock::tool_result("call_1", "{}", false)]);
        assert_eq!(results.role, Role::User);
        assert_eq!(results.content.as_text(), None);

        let echo = Message::assistant_blocks(vec![ContentBlock::text("Checking trends")]);
        assert_eq!(echo.role, Role::Assistant);
    }

    #[test]
    fn test_stop_reason_from_finish_reason() {
        let cases = [
            (Some("stop"), StopReason::EndTurn),
            (Some("tool_calls"), StopReason::ToolUse),
            (Some("length"), StopReason::MaxTokens),
            (Some("content_filter"), StopReason::EndTurn),
            (None, StopReason::EndTurn),
        ];
        for (raw, expected) in cases {
            assert_eq!(StopReason::from_finish_reason(raw), expected, "{:?}", raw);
        }
    }

    #[test]
    fn test_token_usage_accumulates() {
        let mut total = TokenUsage::default();
        for (input, output) in [(100, 20), (50, 5), (7, 0)] {
            total.add(TokenUsage {
                input_tokens: input,
                output_tokens: output,
            });
        }
        assert_eq!(
            total,
            TokenUsage {
                input_tokens: 157,
                output_tokens: 25
            }
        );
    }

    #[test]
    fn test_tool_definition_openai_shape() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": { "copy_text": { "type": "string" } },
            "required": ["copy_text"]
        });
        let tool = ToolDefinition::new("copy_evaluator", "Score marketing copy", schema.clone());

        let entry = tool.to_openai_schema();
        assert_eq!(entry["type"], "function");
        assert_eq!(entry["function"]["name"], "copy_evaluator");
        assert_eq!(entry["function"]["description"], "Score marketing copy");
        assert_eq!(entry["function"]["parameters"], schema);
    }
}
