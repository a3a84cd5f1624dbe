//! ToolExecutor - manages tool execution for the campaign agents

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::llm::{ToolCall, ToolDefinition};

use super::builtin::{CompetitorAnalysisTool, CopyEvaluationTool, ImagePromptTool, TrendResearchTool};
use super::{Tool, ToolContext, ToolError, ToolResult};

/// Registry of tools, queried per agent by grant list
pub struct ToolExecutor {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolExecutor {
    /// Create executor with the four built-in campaign tools
    pub fn builtin() -> Self {
        debug!("ToolExecutor::builtin: called");
        let mut executor = Self::empty();
        executor.add_tool(Box::new(TrendResearchTool));
        executor.add_tool(Box::new(CompetitorAnalysisTool));
        executor.add_tool(Box::new(CopyEvaluationTool));
        executor.add_tool(Box::new(ImagePromptTool));
        executor
    }

    /// Create an empty executor (for testing)
    pub fn empty() -> Self {
        debug!("ToolExecutor::empty: called");
        Self { tools: HashMap::new() }
    }

    /// Add a tool to the executor
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        debug!(tool_name = %tool.name(), "ToolExecutor::add_tool: called");
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get definitions for a subset of tools by name, in grant order
    pub fn definitions_for(&self, tool_names: &[&str]) -> Vec<ToolDefinition> {
        debug!(?tool_names, "ToolExecutor::definitions_for: called");
        tool_names
            .iter()
            .filter_map(|name| self.tools.get(*name))
            .map(|t| t.definition())
            .collect()
    }

    /// Execute a tool call on behalf of an agent
    ///
    /// Calls to tools outside `granted` are refused with an error result.
    pub async fn execute(&self, tool_call: &ToolCall, granted: &[&str], agent: &str, ctx: &ToolContext) -> ToolResult {
        debug!(tool_name = %tool_call.name, tool_id = %tool_call.id, %agent, "ToolExecutor::execute: called");
        if !granted.contains(&tool_call.name.as_str()) {
            warn!(tool_name = %tool_call.name, %agent, "ToolExecutor::execute: tool not granted");
            let err = if self.tools.contains_key(&tool_call.name) {
                ToolError::NotGranted {
                    name: tool_call.name.clone(),
                    agent: agent.to_string(),
                }
            } else {
                ToolError::UnknownTool {
                    name: tool_call.name.clone(),
                }
            };
            return err.into();
        }

        match self.tools.get(&tool_call.name) {
            Some(tool) => tool.execute(tool_call.input.clone(), ctx).await,
            None => {
                debug!("ToolExecutor::execute: unknown tool");
                ToolError::UnknownTool {
                    name: tool_call.name.clone(),
                }
                .into()
            }
        }
    }

    /// Execute multiple tool calls sequentially
    pub async fn execute_all(
        &self,
        tool_calls: &[ToolCall],
        granted: &[&str],
        agent: &str,
        ctx: &ToolContext,
    ) -> Vec<(String, ToolResult)> {
        debug!(count = %tool_calls.len(), "ToolExecutor::execute_all: called");
        let mut results = Vec::with_capacity(tool_calls.len());
        for call in tool_calls {
            let result = self.execute(call, granted, agent, ctx).await;
            results.push((call.id.clone(), result));
        }
        results
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, input: serde_json::Value) -> ToolCall {
        ToolCall {
            id: "call_1".to_string(),
            name: name.to_string(),
            input,
        }
    }

    #[test]
    fn test_builtin_executor_has_campaign_tools() {
        let executor = ToolExecutor::builtin();

        assert!(executor.has_tool("trend_research"));
        assert!(executor.has_tool("competitor_analysis"));
        assert!(executor.has_tool("copy_evaluator"));
        assert!(executor.has_tool("image_prompt_generator"));
    }

    #[test]
    fn test_definitions_for_subset() {
        let executor = ToolExecutor::builtin();
        let defs = executor.definitions_for(&["trend_research", "competitor_analysis"]);

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "trend_research");
        assert_eq!(defs[1].name, "competitor_analysis");
        assert!(executor.definitions_for(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_execute_granted_tool() {
        let executor = ToolExecutor::builtin();
        let result = executor
            .execute(
                &call("copy_evaluator", serde_json::json!({"copy_text": "Buy now"})),
                &["copy_evaluator"],
                "Senior Creative Copywriter",
                &ToolContext::offline(),
            )
            .await;
        assert!(!result.is_error);
        assert!(result.content.contains("overall_score"));
    }

    #[tokio::test]
    async fn test_execute_refuses_ungranted_tool() {
        let executor = ToolExecutor::builtin();
        let result = executor
            .execute(
                &call("copy_evaluator", serde_json::json!({"copy_text": "Buy now"})),
                &["image_prompt_generator"],
                "Senior Art Director",
                &ToolContext::offline(),
            )
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("not available to the Senior Art Director"));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let executor = ToolExecutor::builtin();
        let result = executor
            .execute(
                &call("bash", serde_json::json!({})),
                &["trend_research"],
                "Senior Market Research Analyst",
                &ToolContext::offline(),
            )
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("Tool not found"));
    }
}
