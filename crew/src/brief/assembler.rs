//! Brief Assembler: request + stage results → CampaignBrief

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{CampaignBrief, CampaignRequest, StageKind, StageResult, TranscriptEntry};

/// Characters of the management text kept as the executive summary
pub const EXECUTIVE_SUMMARY_CHARS: usize = 3000;

/// First `max_chars` characters of `text`, never splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Package a run's results into the final brief
///
/// Total over its inputs: a missing management result yields empty summary
/// fields rather than an error.
pub fn assemble(
    request: &CampaignRequest,
    results: &[StageResult],
    run_id: impl Into<String>,
    created_at: DateTime<Utc>,
) -> CampaignBrief {
    debug!(results = results.len(), "assemble: called");
    let management = results
        .iter()
        .find(|r| r.stage == StageKind::Management)
        .map(|r| r.output.as_str())
        .unwrap_or_default();

    CampaignBrief {
        run_id: run_id.into(),
        client_name: request.product_name.clone(),
        campaign_name: format!("{} Campaign", request.product_name),
        objective: request.campaign_goals.clone(),
        target_audience: request.target_audience.clone(),
        request: request.clone(),
        research: None,
        copy_package: None,
        visuals: None,
        executive_summary: truncate_chars(management, EXECUTIVE_SUMMARY_CHARS).to_string(),
        final_recommendations: management.to_string(),
        transcript: results
            .iter()
            .map(|r| TranscriptEntry {
                stage: r.stage,
                agent: r.agent.clone(),
                output: r.output.clone(),
            })
            .collect(),
        created_at,
    }
}
