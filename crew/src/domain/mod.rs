//! Domain types for campaigncrew
//!
//! The request flowing into a run, the per-stage tasks and results flowing
//! through it, and the brief coming out.

mod brief;
mod request;
mod stage;

pub use brief::{CampaignBrief, CopyPackage, MarketResearch, TranscriptEntry, VisualDirection};
pub use request::{CampaignChannel, CampaignRequest, CopyTone, RequestFileError, ValidationError};
pub use stage::{StageKind, StageResult, StageTask};
