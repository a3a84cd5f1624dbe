//! CampaignBrief: the final artifact of a run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CampaignRequest, StageKind};

/// Structured research findings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketResearch {
    pub market_summary: String,
    pub trends: Vec<String>,
    pub opportunities: Vec<String>,
}

/// Structured copy deliverables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyPackage {
    pub campaign_tagline: String,
    pub elevator_pitch: String,
    pub email_subjects: Vec<String>,
    pub hashtags: Vec<String>,
}

/// Structured visual direction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualDirection {
    pub brand_visual_identity: String,
    pub key_visuals: Vec<String>,
    pub image_prompts: Vec<String>,
}

/// One stage's contribution, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub stage: StageKind,
    pub agent: String,
    pub output: String,
}

/// The assembled campaign brief
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignBrief {
    pub run_id: String,
    pub client_name: String,
    pub campaign_name: String,
    pub objective: String,
    pub target_audience: String,
    pub request: CampaignRequest,

    /// Only populated by a structured extraction step, which does not exist yet
    pub research: Option<MarketResearch>,
    pub copy_package: Option<CopyPackage>,
    pub visuals: Option<VisualDirection>,

    pub executive_summary: String,
    pub final_recommendations: String,
    pub transcript: Vec<TranscriptEntry>,
    pub created_at: DateTime<Utc>,
}

impl CampaignBrief {
    /// Transcript entry for a stage
    pub fn stage_output(&self, stage: StageKind) -> Option<&TranscriptEntry> {
        self.transcript.iter().find(|e| e.stage == stage)
    }
}
