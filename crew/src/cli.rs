//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// campaigncrew - multi-agent marketing campaign briefs
#[derive(Parser)]
#[command(
    name = "crew",
    about = "Generate a marketing campaign brief with a four-agent crew",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Directory for generated briefs (overrides config and OUTPUT_DIR)
    #[arg(short, long = "output-dir", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Subcommand to execute; defaults to `new`
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the built-in AeroFlow Pro sample campaign
    Demo,

    /// Describe a campaign interactively, then run it
    New,

    /// Run a campaign request loaded from a YAML or JSON file
    Run {
        /// Request file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Run one auxiliary tool offline and print its JSON output
    Tool {
        #[command(subcommand)]
        command: ToolCommand,
    },
}

/// Auxiliary tool subcommands
#[derive(Debug, Subcommand)]
pub enum ToolCommand {
    /// Market trends and consumer insights
    Trends {
        /// Topic to research
        query: String,

        /// Industry context
        #[arg(short, long, default_value = "general")]
        industry: String,
    },

    /// Simulated competitor landscape
    Competitors {
        /// Product category or market
        query: String,

        /// Number of competitor profiles (1-20)
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },

    /// Score marketing copy for a channel
    Evaluate {
        /// Copy to evaluate
        text: String,

        /// Target channel (social_media, email, search_ads, ...)
        #[arg(long, default_value = "general")]
        channel: String,
    },

    /// Image generation prompts for a visual concept
    Image {
        /// Visual concept
        concept: String,

        /// Brand style (modern, playful, luxury, tech)
        #[arg(short, long, default_value = "modern")]
        style: String,

        /// Target platform (feed, story, banner)
        #[arg(short, long, default_value = "feed")]
        platform: String,
    },
}

impl ToolCommand {
    /// Registered tool name and JSON input for this subcommand
    pub fn to_call(&self) -> (&'static str, serde_json::Value) {
        debug!(?self, "ToolCommand::to_call: called");
        match self {
            Self::Trends { query, industry } => (
                "trend_research",
                serde_json::json!({ "query": query, "industry": industry }),
            ),
            Self::Competitors { query, count } => (
                "competitor_analysis",
                serde_json::json!({ "query": query, "num_competitors": count }),
            ),
            Self::Evaluate { text, channel } => (
                "copy_evaluator",
                serde_json::json!({ "copy_text": text, "channel": channel }),
            ),
            Self::Image {
                concept,
                style,
                platform,
            } => (
                "image_prompt_generator",
                serde_json::json!({ "concept": concept, "brand_style": style, "target_platform": platform }),
            ),
        }
    }
}

/// Location of the log file
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("campaigncrew")
        .join("logs")
        .join("campaigncrew.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with credential checks and the log path
pub fn generate_after_help(model_key_env: &str, search_key_env: &str) -> String {
    debug!("generate_after_help: called");
    let mut help = String::from("Credentials:\n");
    for (var, purpose) in [(model_key_env, "model API"), (search_key_env, "live trend search (optional)")] {
        let set = std::env::var(var).map(|v| !v.trim().is_empty()).unwrap_or(false);
        let icon = if set { "\u{2705}" } else { "\u{274C}" };
        help.push_str(&format!("  {} {:<16} {}\n", icon, var, purpose));
    }

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}
