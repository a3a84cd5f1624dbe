//! Built-in tools available to the campaign agents

mod competitor_analysis;
mod copy_evaluation;
mod image_prompt;
mod trend_research;

pub use competitor_analysis::{
    CompetitorAnalysisTool, CompetitorProfile, CompetitorReport, MAX_COMPETITORS, analyze_competitors,
    check_competitor_count,
};
pub use copy_evaluation::{CopyEvaluation, CopyEvaluationTool, CopyMetrics, CopyScores, channel_char_limit, evaluate_copy};
pub use image_prompt::{ImagePromptSet, ImagePromptTool, PlatformSpec, generate_image_prompts, platform_spec};
pub use trend_research::{Trend, TrendReport, TrendResearchTool, format_search_results, live_search, simulated_trends};
