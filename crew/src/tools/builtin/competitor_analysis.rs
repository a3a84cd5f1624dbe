//! competitor_analysis tool - deterministic competitive landscape

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::tools::traits::parse_input;
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Largest competitor count the tool accepts from the model
pub const MAX_COMPETITORS: usize = 20;

/// Analyse competitors and market gaps for a category
pub struct CompetitorAnalysisTool;

#[derive(Debug, Deserialize)]
struct CompetitorAnalysisInput {
    query: String,
    #[serde(default = "default_num_competitors")]
    num_competitors: usize,
}

fn default_num_competitors() -> usize {
    3
}

/// One competitor profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorProfile {
    pub name: String,
    pub market_position: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub key_message: String,
    pub estimated_market_share: String,
}

/// Full competitor analysis payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorReport {
    pub analysis_for: String,
    pub methodology: String,
    pub competitors: Vec<CompetitorProfile>,
    pub market_gaps: Vec<String>,
    pub differentiation_opportunities: Vec<String>,
}

fn competitor_name(idx: usize) -> String {
    match u8::try_from(idx) {
        Ok(i) if i < 26 => format!("Competitor {}", char::from(b'A' + i)),
        _ => format!("Competitor {}", idx + 1),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Build exactly `num_competitors` profiles for `query`
pub fn analyze_competitors(query: &str, num_competitors: usize) -> CompetitorReport {
    debug!(%query, num_competitors, "analyze_competitors: called");
    let competitors = (0..num_competitors)
        .map(|idx| {
            let (market_position, key_message) = match idx {
                0 => ("Market leader with established brand", "Trusted by millions worldwide"),
                1 => ("Fast-growing challenger with innovative features", "The future of smart"),
                _ => ("Niche player with loyal community", "Built for people who care"),
            };
            // Share shrinks by 8 points per rank and bottoms out at 2%
            let share = 30usize.saturating_sub(idx * 8).max(2);

            CompetitorProfile {
                name: competitor_name(idx),
                market_position: market_position.to_string(),
                strengths: strings(&[
                    "Strong brand recognition",
                    "Extensive distribution network",
                    "Competitive pricing",
                ]),
                weaknesses: strings(&[
                    "Slow to innovate",
                    "Poor customer support ratings",
                    "Limited personalisation options",
                ]),
                key_message: key_message.to_string(),
                estimated_market_share: format!("{}%", share),
            }
        })
        .collect();

    CompetitorReport {
        analysis_for: query.to_string(),
        methodology: "Competitive positioning analysis using Porter's Five Forces lens combined with messaging audit."
            .to_string(),
        competitors,
        market_gaps: strings(&[
            "No competitor strongly owns the sustainability narrative.",
            "Customer onboarding experiences are universally mediocre.",
            "Underserved segments in the 25-34 age bracket.",
        ]),
        differentiation_opportunities: strings(&[
            "Lead with transparency and social proof.",
            "Invest in community-driven content.",
            "Offer a freemium tier to capture top-of-funnel.",
        ]),
    }
}

/// Range-check a requested competitor count
pub fn check_competitor_count(n: usize) -> Result<usize, ToolError> {
    if n == 0 || n > MAX_COMPETITORS {
        return Err(ToolError::InvalidArgument(format!(
            "num_competitors must be between 1 and {}, got {}",
            MAX_COMPETITORS, n
        )));
    }
    Ok(n)
}

#[async_trait]
impl Tool for CompetitorAnalysisTool {
    fn name(&self) -> &'static str {
        "competitor_analysis"
    }

    fn description(&self) -> &'static str {
        "Analyse competitors, positioning, strengths, weaknesses and market gaps for a given category. \
         Returns structured JSON."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Market or product category"
                },
                "num_competitors": {
                    "type": "integer",
                    "description": "Number of competitors to include (default: 3)",
                    "minimum": 1,
                    "maximum": MAX_COMPETITORS
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        debug!(?input, "CompetitorAnalysisTool::execute: called");
        let input: CompetitorAnalysisInput = match parse_input(input) {
            Ok(i) => i,
            Err(e) => return e.into(),
        };
        check_competitor_count(input.num_competitors)
            .map(|n| analyze_competitors(&input.query, n))
            .into()
    }
}
