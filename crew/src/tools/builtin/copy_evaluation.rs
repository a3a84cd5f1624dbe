//! copy_evaluator tool - heuristic scoring of marketing copy

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::tools::traits::parse_input;
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

const WEAK_WORDS: [&str; 6] = ["maybe", "possibly", "somewhat", "very", "nice", "quite"];
const POWER_WORDS: [&str; 6] = ["exclusive", "proven", "free", "limited", "save", "now"];
const CTA_PHRASES: [&str; 5] = ["buy", "sign up", "get", "pre-order", "try"];

/// Character budget used for channels without an explicit limit
const DEFAULT_CHAR_LIMIT: usize = 1000;

/// Sentences longer than this (in words) lower readability
const MAX_AVG_SENTENCE_WORDS: f64 = 20.0;

/// Evaluate marketing copy for clarity, persuasion and channel fit
pub struct CopyEvaluationTool;

#[derive(Debug, Deserialize)]
struct CopyEvaluationInput {
    copy_text: String,
    #[serde(default = "default_channel")]
    channel: String,
}

fn default_channel() -> String {
    "general".to_string()
}

/// Component scores, each in [0, 1] and rounded to two decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyScores {
    pub readability: f64,
    pub emotional_impact: f64,
    pub clarity: f64,
    pub cta_strength: f64,
    pub length_appropriateness: f64,
}

impl CopyScores {
    fn mean(&self) -> f64 {
        (self.readability + self.emotional_impact + self.clarity + self.cta_strength + self.length_appropriateness)
            / 5.0
    }
}

/// Raw text measurements behind the scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyMetrics {
    pub word_count: usize,
    pub character_count: usize,
    pub sentence_count: usize,
    pub avg_sentence_length: f64,
    pub power_words_found: usize,
    pub weak_words_found: usize,
    pub channel_char_limit: usize,
}

/// Full evaluation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyEvaluation {
    pub overall_score: f64,
    pub scores: CopyScores,
    pub metrics: CopyMetrics,
    pub suggestions: Vec<String>,
}

/// Character limit for a channel name
pub fn channel_char_limit(channel: &str) -> usize {
    match channel.trim().to_lowercase().as_str() {
        "social_media" => 280,
        "search_ads" => 90,
        "email" => 1200,
        _ => DEFAULT_CHAR_LIMIT,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Lowercased word tokens; hyphens and apostrophes stay inside words
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '\''))
        .map(|t| t.trim_matches(|c| c == '-' || c == '\''))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a (possibly multi-word) phrase occurs as whole tokens
fn contains_phrase(tokens: &[String], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > tokens.len() {
        return false;
    }
    tokens
        .windows(needle.len())
        .any(|w| w.iter().zip(&needle).all(|(t, n)| t == n))
}

fn count_present(tokens: &[String], words: &[&str]) -> usize {
    words.iter().filter(|w| contains_phrase(tokens, w)).count()
}

/// Score a piece of copy for a channel
pub fn evaluate_copy(copy_text: &str, channel: &str) -> CopyEvaluation {
    debug!(len = copy_text.len(), %channel, "evaluate_copy: called");
    let text = copy_text.trim();
    let tokens = tokenize(text);

    let word_count = text.split_whitespace().count();
    let character_count = text.chars().count();
    let sentence_count = text.chars().filter(|c| matches!(c, '.' | '!' | '?')).count().max(1);
    let avg_sentence_length = word_count as f64 / sentence_count as f64;

    let weak_hits = count_present(&tokens, &WEAK_WORDS);
    let power_hits = count_present(&tokens, &POWER_WORDS);
    let has_cta = CTA_PHRASES.iter().any(|p| contains_phrase(&tokens, p));

    let limit = channel_char_limit(channel);
    let length_score = if character_count <= limit {
        1.0
    } else {
        (1.0 - (character_count - limit) as f64 / limit as f64).max(0.0)
    };

    let scores = CopyScores {
        readability: if avg_sentence_length <= MAX_AVG_SENTENCE_WORDS { 1.0 } else { 0.7 },
        emotional_impact: round_to((power_hits as f64 * 0.2).min(1.0), 2),
        clarity: round_to((1.0 - weak_hits as f64 * 0.1).max(0.0), 2),
        cta_strength: if has_cta { 1.0 } else { 0.5 },
        length_appropriateness: round_to(length_score, 2),
    };

    let mut suggestions = Vec::new();
    if power_hits == 0 {
        suggestions.push("Add power words (e.g., 'exclusive', 'proven', 'free').".to_string());
    }
    if scores.length_appropriateness < 0.7 {
        suggestions.push(format!("Copy is too long for {}. Trim to fit limits.", channel));
    }
    if scores.cta_strength < 0.8 {
        suggestions.push("Strengthen the CTA with a clear action verb.".to_string());
    }
    if suggestions.is_empty() {
        suggestions.push("Copy looks solid; minor tweaks at most.".to_string());
    }

    CopyEvaluation {
        overall_score: round_to(scores.mean(), 2),
        scores,
        metrics: CopyMetrics {
            word_count,
            character_count,
            sentence_count,
            avg_sentence_length: round_to(avg_sentence_length, 1),
            power_words_found: power_hits,
            weak_words_found: weak_hits,
            channel_char_limit: limit,
        },
        suggestions,
    }
}

#[async_trait]
impl Tool for CopyEvaluationTool {
    fn name(&self) -> &'static str {
        "copy_evaluator"
    }

    fn description(&self) -> &'static str {
        "Evaluate marketing copy for clarity, persuasion and fit for channel."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "copy_text": {
                    "type": "string",
                    "description": "Marketing copy to evaluate"
                },
                "channel": {
                    "type": "string",
                    "description": "Channel context, e.g. social_media, email, search_ads (default: general)"
                }
            },
            "required": ["copy_text"]
        })
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        debug!("CopyEvaluationTool::execute: called");
        let input: CopyEvaluationInput = match parse_input(input) {
            Ok(i) => i,
            Err(e) => return e.into(),
        };
        if input.copy_text.trim().is_empty() {
            return ToolError::InvalidArgument("copy_text must not be empty".to_string()).into();
        }
        ToolResult::json(&evaluate_copy(&input.copy_text, &input.channel))
    }
}
