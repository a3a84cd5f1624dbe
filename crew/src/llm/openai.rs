//! OpenAI-compatible chat completions client
//!
//! Works against any endpoint speaking the `/v1/chat/completions` protocol,
//! including Groq's OpenAI-compatible API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError, Message, MessageContent, Role,
    StopReason, TokenUsage, ToolCall,
};
use crate::config::ResolvedLlmConfig;

/// First retry delay; doubles on each further attempt
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Longest `retry-after` we are willing to sleep through inside the client
const MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(30);

/// Used when a 429 carries no usable `retry-after`
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Chat completions client for Groq and other compatible providers
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    temperature: f32,
    max_retries: u32,
}

impl OpenAIClient {
    pub fn from_config(config: &ResolvedLlmConfig) -> Result<Self, LlmError> {
        debug!(?config, "OpenAIClient::from_config: called");
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// JSON body for one chat completions call
    fn build_request_body(&self, request: &CompletionRequest) -> Value {
        debug!(%self.model, %request.max_tokens, "OpenAIClient::build_request_body: called");
        let system = json!({ "role": "system", "content": request.system_prompt });
        let messages: Vec<Value> = std::iter::once(system).chain(wire_messages(&request.messages)).collect();

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": request.max_tokens.min(self.max_tokens),
            "temperature": request.temperature.unwrap_or(self.temperature),
        });

        if !request.tools.is_empty() {
            let tools: Vec<Value> = request.tools.iter().map(|t| t.to_openai_schema()).collect();
            body["tools"] = Value::Array(tools);
            body["tool_choice"] = json!("auto");
        }
        body
    }

    /// One HTTP round trip with no retries
    async fn send_once(&self, body: &Value) -> Result<CompletionResponse, LlmError> {
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RETRY_AFTER);
            return Err(LlmError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let api_response: OpenAIResponse = response.json().await?;
        Ok(parse_response(api_response))
    }

    /// Delay before the next attempt, or `None` when the error is final
    fn backoff_for(&self, err: &LlmError, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries || !err.is_retryable() {
            return None;
        }
        match err {
            LlmError::RateLimited { retry_after } if *retry_after > MAX_RATE_LIMIT_WAIT => None,
            LlmError::RateLimited { retry_after } => Some(*retry_after),
            _ => Some(INITIAL_BACKOFF * 2u32.pow(attempt)),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "OpenAIClient::complete: called");
        let body = self.build_request_body(&request);

        let mut attempt = 0;
        loop {
            match self.send_once(&body).await {
                Ok(response) => return Ok(response),
                Err(err) => match self.backoff_for(&err, attempt) {
                    Some(delay) => {
                        warn!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "OpenAIClient::complete: retrying");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(err),
                },
            }
        }
    }
}

/// Translate the conversation into wire messages
///
/// The API wants one `tool` message per result, so a user turn holding
/// several tool results expands into several entries.
fn wire_messages(messages: &[Message]) -> Vec<Value> {
    messages.iter().flat_map(wire_message).collect()
}

fn wire_message(message: &Message) -> Vec<Value> {
    let role = match message.role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    let blocks = match &message.content {
        MessageContent::Text(text) => return vec![json!({ "role": role, "content": text })],
        MessageContent::Blocks(blocks) => blocks,
    };

    let results: Vec<Value> = blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::ToolResult {
                tool_use_id, content, ..
            } => Some(json!({ "role": "tool", "tool_call_id": tool_use_id, "content": content })),
            _ => None,
        })
        .collect();
    if !results.is_empty() {
        return results;
    }

    let mut text = String::new();
    let mut calls = Vec::new();
    for block in blocks {
        match block {
            ContentBlock::Text { text: t } => text.push_str(t),
            ContentBlock::ToolUse { id, name, input } => calls.push(json!({
                "id": id,
                "type": "function",
                "function": { "name": name, "arguments": input.to_string() },
            })),
            ContentBlock::ToolResult { .. } => {}
        }
    }

    if calls.is_empty() {
        return vec![json!({ "role": role, "content": text })];
    }
    let mut entry = json!({ "role": "assistant", "tool_calls": calls });
    if !text.is_empty() {
        entry["content"] = Value::String(text);
    }
    vec![entry]
}

/// Map the first choice into a provider-neutral response
fn parse_response(api_response: OpenAIResponse) -> CompletionResponse {
    debug!(choice_count = %api_response.choices.len(), "parse_response: called");
    let usage = api_response
        .usage
        .map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    let Some(choice) = api_response.choices.into_iter().next() else {
        return CompletionResponse {
            content: None,
            tool_calls: vec![],
            stop_reason: StopReason::EndTurn,
            usage,
        };
    };

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            let input = serde_json::from_str(&call.function.arguments).unwrap_or_else(|e| {
                warn!(tool = %call.function.name, error = %e, "parse_response: unparseable tool arguments");
                json!({})
            });
            ToolCall {
                id: call.id,
                name: call.function.name,
                input,
            }
        })
        .collect();

    CompletionResponse {
        content: choice.message.content,
        tool_calls,
        stop_reason: StopReason::from_finish_reason(choice.finish_reason.as_deref()),
        usage,
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAIToolCall {
    id: String,
    function: OpenAIFunction,
}

#[derive(Debug, Deserialize)]
struct OpenAIFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
