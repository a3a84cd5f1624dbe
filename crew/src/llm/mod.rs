//! LLM client module
//!
//! Provides the raw completion boundary used by the agent invoker.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod openai;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use types::{
    CompletionRequest, CompletionResponse, ContentBlock, Message, MessageContent, Role, StopReason, TokenUsage,
    ToolCall, ToolDefinition,
};

use crate::config::{ConfigError, LlmConfig, ResolvedLlmConfig};

/// Create an LLM client based on the provider specified in config
///
/// Resolves the credential first, so a missing key fails here rather than
/// on the first request.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, ClientSetupError> {
    create_client_from_resolved(&config.resolve()?)
}

/// Create an LLM client from a resolved configuration
pub fn create_client_from_resolved(config: &ResolvedLlmConfig) -> Result<Arc<dyn LlmClient>, ClientSetupError> {
    debug!(provider = %config.provider, model = %config.model, "create_client_from_resolved: called");
    match config.provider.as_str() {
        "groq" | "openai" => Ok(Arc::new(OpenAIClient::from_config(config)?)),
        other => Err(ConfigError::unsupported_provider(other).into()),
    }
}

/// Failure while constructing a client
#[derive(Debug, thiserror::Error)]
pub enum ClientSetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}
