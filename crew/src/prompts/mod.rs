//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for the stage
//! instructions and the agent personas.
//!
//! Template loading chain:
//! 1. `{prompts-dir}/{name}.pmt` (user override, from config)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax with HTML escaping disabled.

pub mod embedded;
mod loader;

pub use loader::{PromptError, PromptLoader};
