//! Agents: role descriptors and the model-invocation boundary

mod descriptor;
mod invoker;

pub use descriptor::{ART_DIRECTOR, AgentDescriptor, AgentRole, COPYWRITER, MANAGER, RESEARCH, roster};
pub use invoker::{AgentInvoker, DEFAULT_MAX_TOKENS, ToolLoopInvoker};
