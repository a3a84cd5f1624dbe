//! Tool system for the campaign agents
//!
//! Tools are deterministic helpers the model may call mid-stage. Each agent
//! sees only the tools its descriptor grants; everything else is refused.

mod context;
mod error;
mod executor;
mod traits;

pub mod builtin;

pub use context::ToolContext;
pub use error::ToolError;
pub use executor::ToolExecutor;
pub use traits::{Tool, ToolResult, parse_input};
