//! The completion boundary every agent talks through

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// One chat completion per call
///
/// Clients hold no conversation state. Tool calls and their results travel
/// in the request's message list.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
