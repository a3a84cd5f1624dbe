//! Model-invocation boundary
//!
//! The orchestrator only sees [`AgentInvoker`]; the production implementation
//! runs a tool-calling conversation against an [`LlmClient`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{AgentDescriptor, AgentRole, roster};
use crate::domain::StageTask;
use crate::llm::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError, Message, StopReason, TokenUsage,
};
use crate::prompts::{PromptError, PromptLoader};
use crate::tools::{ToolContext, ToolExecutor, ToolResult};

/// Default response budget per model call
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Runs one agent on one stage task and returns its final text
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(&self, agent: &AgentDescriptor, task: &StageTask<'_>) -> Result<String, LlmError>;
}

#[derive(Serialize)]
struct PersonaContext<'a> {
    title: &'a str,
    goal: &'a str,
    backstory: &'a str,
    tools: Option<String>,
}

#[derive(Serialize)]
struct FinalAnswerContext {
    max_rounds: u32,
}

/// Rendered prompts for one agent
struct AgentPrompts {
    system: String,
    final_answer: String,
}

/// Tool-calling loop over an OpenAI-compatible model
pub struct ToolLoopInvoker {
    llm: Arc<dyn LlmClient>,
    tools: ToolExecutor,
    ctx: ToolContext,
    prompts: HashMap<AgentRole, AgentPrompts>,
    max_tokens: u32,
}

impl ToolLoopInvoker {
    /// Create an invoker, rendering every agent's persona up front
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: ToolExecutor,
        ctx: ToolContext,
        loader: &PromptLoader,
        max_tokens: u32,
    ) -> Result<Self, PromptError> {
        debug!(max_tokens, "ToolLoopInvoker::new: called");
        let mut prompts = HashMap::new();
        for agent in roster() {
            let persona = PersonaContext {
                title: agent.title,
                goal: agent.goal,
                backstory: agent.backstory,
                tools: (!agent.tools.is_empty()).then(|| agent.tools.join(", ")),
            };
            let final_answer = FinalAnswerContext {
                max_rounds: agent.max_tool_rounds,
            };
            prompts.insert(
                agent.role,
                AgentPrompts {
                    system: loader.render("agent", &persona)?,
                    final_answer: loader.render("final-answer", &final_answer)?,
                },
            );
        }

        Ok(Self {
            llm,
            tools,
            ctx,
            prompts,
            max_tokens,
        })
    }

    fn prompts_for(&self, agent: &AgentDescriptor) -> Result<&AgentPrompts, LlmError> {
        self.prompts
            .get(&agent.role)
            .ok_or_else(|| LlmError::InvalidResponse(format!("No prompts rendered for {}", agent.role)))
    }

    /// Convert a model response into a conversation message
    fn response_to_message(response: &CompletionResponse) -> Message {
        let mut blocks = Vec::new();

        if let Some(text) = &response.content
            && !text.is_empty()
        {
            blocks.push(ContentBlock::text(text));
        }

        for call in &response.tool_calls {
            blocks.push(ContentBlock::ToolUse {
                id: call.id.clone(),
                name: call.name.clone(),
                input: call.input.clone(),
            });
        }

        Message::assistant_blocks(blocks)
    }

    /// Format tool results as a user message
    fn format_tool_results(results: &[(String, ToolResult)]) -> Message {
        let blocks: Vec<ContentBlock> = results
            .iter()
            .map(|(id, result)| ContentBlock::tool_result(id, &result.content, result.is_error))
            .collect();

        Message::user_blocks(blocks)
    }

    /// Final text of a response; blank answers are invalid
    fn final_text(agent: &AgentDescriptor, response: CompletionResponse) -> Result<String, LlmError> {
        if response.stop_reason == StopReason::MaxTokens {
            warn!(agent = %agent.title, "ToolLoopInvoker: answer truncated at max tokens");
        }
        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(LlmError::InvalidResponse(format!(
                "{} returned an empty answer",
                agent.title
            ))),
        }
    }
}

#[async_trait]
impl AgentInvoker for ToolLoopInvoker {
    async fn invoke(&self, agent: &AgentDescriptor, task: &StageTask<'_>) -> Result<String, LlmError> {
        debug!(agent = %agent.title, stage = %task.stage, "ToolLoopInvoker::invoke: called");
        let prompts = self.prompts_for(agent)?;
        let tool_defs = self.tools.definitions_for(agent.tools);
        let mut messages = vec![Message::user(task.instruction.as_str())];
        let mut usage = TokenUsage::default();

        for round in 1..=agent.max_tool_rounds {
            let request = CompletionRequest {
                system_prompt: prompts.system.clone(),
                messages: messages.clone(),
                tools: tool_defs.clone(),
                max_tokens: self.max_tokens,
                temperature: agent.temperature,
            };

            let response = self.llm.complete(request).await?;
            usage.add(response.usage);
            debug!(
                round,
                stop_reason = ?response.stop_reason,
                tool_calls = response.tool_calls.len(),
                "ToolLoopInvoker::invoke: got response"
            );

            if response.tool_calls.is_empty() {
                info!(
                    agent = %agent.title,
                    rounds = round,
                    input_tokens = usage.input_tokens,
                    output_tokens = usage.output_tokens,
                    "Agent finished"
                );
                return Self::final_text(agent, response);
            }

            messages.push(Self::response_to_message(&response));
            let results = self
                .tools
                .execute_all(&response.tool_calls, agent.tools, agent.title, &self.ctx)
                .await;
            messages.push(Self::format_tool_results(&results));
        }

        info!(agent = %agent.title, max_rounds = agent.max_tool_rounds, "Tool round limit reached, forcing final answer");
        messages.push(Message::user(prompts.final_answer.as_str()));
        let request = CompletionRequest {
            system_prompt: prompts.system.clone(),
            messages,
            tools: vec![],
            max_tokens: self.max_tokens,
            temperature: agent.temperature,
        };
        let response = self.llm.complete(request).await?;
        usage.add(response.usage);
        info!(
            agent = %agent.title,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Agent finished after forced answer"
        );
        Self::final_text(agent, response)
    }
}
