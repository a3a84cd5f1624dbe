//! The `Tool` trait and the result handed back to the model

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ToolError;
use super::context::ToolContext;
use crate::llm::ToolDefinition;

/// A deterministic helper an agent may call mid-stage
///
/// Implementations never fail the stage: bad arguments come back as an
/// error [`ToolResult`] the model can read and correct.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Function name the model calls
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON Schema of the arguments object
    fn input_schema(&self) -> Value;

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult;

    /// Definition advertised to the model
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
    }
}

/// Text returned to the model for one tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }

    /// Pretty-printed JSON report; an encoding failure becomes an error result
    pub fn json<T: Serialize>(report: &T) -> Self {
        serde_json::to_string_pretty(report)
            .map(Self::success)
            .unwrap_or_else(|e| Self::error(format!("Failed to encode tool output: {}", e)))
    }
}

impl From<ToolError> for ToolResult {
    fn from(err: ToolError) -> Self {
        Self::error(err.to_string())
    }
}

impl<T: Serialize> From<Result<T, ToolError>> for ToolResult {
    fn from(result: Result<T, ToolError>) -> Self {
        match result {
            Ok(report) => Self::json(&report),
            Err(e) => e.into(),
        }
    }
}

/// Deserialize the model's arguments into a typed input struct
pub fn parse_input<T: DeserializeOwned>(input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| ToolError::InvalidArgument(e.to_string()))
}
