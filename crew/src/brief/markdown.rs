//! Markdown rendering of a CampaignBrief

use std::fmt::Write;

use crate::domain::CampaignBrief;

/// Table cells cannot contain raw pipes or newlines
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Render the brief as a standalone Markdown document
pub fn render_markdown(brief: &CampaignBrief) -> String {
    let request = &brief.request;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "# {}\n", brief.campaign_name);
    let _ = writeln!(
        out,
        "**Generated:** {}  ",
        brief.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "**Run:** `{}`\n", brief.run_id);
    let _ = writeln!(out, "---\n");

    let _ = writeln!(out, "## Campaign Configuration\n");
    let _ = writeln!(out, "| Field | Value |");
    let _ = writeln!(out, "|-------|-------|");
    let rows = [
        ("Product", request.product_name.as_str()),
        ("Description", request.product_description.as_str()),
        ("Target Audience", request.target_audience.as_str()),
        ("Goals", request.campaign_goals.as_str()),
        ("Budget", request.budget_range.as_deref().unwrap_or("Not specified")),
    ];
    for (field, value) in rows {
        let _ = writeln!(out, "| **{}** | {} |", field, cell(value));
    }
    let _ = writeln!(out, "| **Channels** | {} |", request.channel_list());
    let _ = writeln!(out, "| **Brand Voice** | {} |", request.brand_voice);
    if let Some(extra) = request.additional_context.as_deref().filter(|s| !s.trim().is_empty()) {
        let _ = writeln!(out, "| **Additional Context** | {} |", cell(extra));
    }
    let _ = writeln!(out, "\n---\n");

    let _ = writeln!(out, "## Full Campaign Brief\n");
    for entry in &brief.transcript {
        let _ = writeln!(out, "### {}: {}\n", entry.stage.title(), entry.agent);
        let _ = writeln!(out, "{}\n", entry.output.trim_end());
    }

    let _ = writeln!(out, "---\n");
    let _ = writeln!(out, "*Generated by campaigncrew*");
    out
}
