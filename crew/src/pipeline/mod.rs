//! Stage chain, run state, and the orchestrator that drives them

mod chain;
mod orchestrator;
mod state;

pub use chain::{CHAIN, StageSpec, spec_for};
pub use orchestrator::{Orchestrator, PipelineError};
pub use state::{PipelineState, ProgressEvent};
