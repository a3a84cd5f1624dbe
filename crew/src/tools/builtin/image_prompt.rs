//! image_prompt_generator tool - image-generation prompts for a visual concept

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::tools::traits::parse_input;
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Generate DALL-E and Stable Diffusion prompts plus composition tips
pub struct ImagePromptTool;

#[derive(Debug, Deserialize)]
struct ImagePromptInput {
    concept: String,
    #[serde(default = "default_style")]
    brand_style: String,
    #[serde(default = "default_platform")]
    target_platform: String,
}

fn default_style() -> String {
    "modern".to_string()
}

fn default_platform() -> String {
    "feed".to_string()
}

/// Output dimensions for a placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub aspect_ratio: String,
    pub resolution: String,
}

/// Full prompt payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePromptSet {
    pub concept: String,
    pub brand_style: String,
    pub platform_specs: PlatformSpec,
    pub dalle_prompt: String,
    pub stable_diffusion_prompt: String,
    pub composition_tips: Vec<String>,
}

/// Style descriptors; unknown styles fall back to modern
fn style_description(brand_style: &str) -> &'static str {
    match brand_style.trim().to_lowercase().as_str() {
        "playful" => "bright colors, whimsical shapes, energetic mood",
        "luxury" => "moody lighting, rich textures, premium materials",
        "tech" => "futuristic, neon accents, sleek surfaces",
        _ => "minimalist, clean lines, soft gradients",
    }
}

/// Placement dimensions; unknown platforms fall back to feed
pub fn platform_spec(target_platform: &str) -> PlatformSpec {
    let (aspect_ratio, resolution) = match target_platform.trim().to_lowercase().as_str() {
        "story" => ("9:16", "1080x1920"),
        "banner" => ("16:9", "1920x1080"),
        _ => ("1:1", "1080x1080"),
    };
    PlatformSpec {
        aspect_ratio: aspect_ratio.to_string(),
        resolution: resolution.to_string(),
    }
}

/// Build the prompt set; every prompt embeds `concept` verbatim
pub fn generate_image_prompts(concept: &str, brand_style: &str, target_platform: &str) -> ImagePromptSet {
    debug!(%brand_style, %target_platform, "generate_image_prompts: called");
    let style = style_description(brand_style);

    ImagePromptSet {
        concept: concept.to_string(),
        brand_style: brand_style.to_string(),
        platform_specs: platform_spec(target_platform),
        dalle_prompt: format!(
            "{}, {}, cinematic lighting, high detail, commercial photography",
            concept, style
        ),
        stable_diffusion_prompt: format!(
            "{}, {}, ultra-detailed, studio lighting, shallow depth of field",
            concept, style
        ),
        composition_tips: vec![
            "Use strong leading lines toward the product.".to_string(),
            "Keep negative space for headline placement.".to_string(),
            "Balance subject weight with light and shadow.".to_string(),
        ],
    }
}

#[async_trait]
impl Tool for ImagePromptTool {
    fn name(&self) -> &'static str {
        "image_prompt_generator"
    }

    fn description(&self) -> &'static str {
        "Generate DALL-E and Stable Diffusion prompts plus composition tips."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "concept": {
                    "type": "string",
                    "description": "Visual concept to describe"
                },
                "brand_style": {
                    "type": "string",
                    "description": "Brand style: modern, playful, luxury, tech (default: modern)"
                },
                "target_platform": {
                    "type": "string",
                    "description": "Placement: feed, story, banner (default: feed)"
                }
            },
            "required": ["concept"]
        })
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        debug!("ImagePromptTool::execute: called");
        let input: ImagePromptInput = match parse_input(input) {
            Ok(i) => i,
            Err(e) => return e.into(),
        };
        if input.concept.trim().is_empty() {
            return ToolError::InvalidArgument("concept must not be empty".to_string()).into();
        }
        ToolResult::json(&generate_image_prompts(
            &input.concept,
            &input.brand_style,
            &input.target_platform,
        ))
    }
}
