//! campaigncrew - sequential multi-agent marketing campaign briefs
//!
//! Four agents work one after another on a single campaign request. Each
//! stage reads the text of the stages before it; the last one writes the
//! strategy that becomes the brief.
//!
//! # Core Concepts
//!
//! - **Agents are data**: one [`agents::AgentDescriptor`] per role, no subclasses
//! - **Fixed chain**: Research → Copywriting → Visual Direction → Management
//! - **Fail fast**: the first model error aborts the run and nothing is saved
//! - **Deterministic tools**: trend, competitor, copy and image-prompt helpers
//!
//! # Modules
//!
//! - [`domain`] - Request, stage, and brief types
//! - [`tasks`] - Stage instruction rendering
//! - [`agents`] - Role roster and the model-invocation boundary
//! - [`pipeline`] - Stage chain and orchestrator
//! - [`brief`] - Brief assembly, Markdown rendering, and storage
//! - [`tools`] - Auxiliary tools exposed to the agents
//! - [`llm`] - Completion client for OpenAI-compatible APIs
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod agents;
pub mod brief;
pub mod cli;
pub mod config;
pub mod crew;
pub mod domain;
pub mod error;
pub mod intake;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod tasks;
pub mod tools;

// Re-export commonly used types
pub use agents::{AgentDescriptor, AgentInvoker, AgentRole, ToolLoopInvoker};
pub use brief::{BriefStore, PersistenceError, SavedBrief, assemble, render_markdown};
pub use config::{Config, ConfigError, LlmConfig};
pub use crew::CampaignCrew;
pub use domain::{
    CampaignBrief, CampaignChannel, CampaignRequest, CopyTone, StageKind, StageResult, StageTask, ValidationError,
};
pub use error::CampaignError;
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use pipeline::{Orchestrator, PipelineError, PipelineState, ProgressEvent};
pub use prompts::{PromptError, PromptLoader};
pub use tasks::{TaskError, TaskFactory};
pub use tools::{Tool, ToolContext, ToolError, ToolExecutor, ToolResult};
