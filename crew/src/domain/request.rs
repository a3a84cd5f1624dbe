//! Campaign request: the immutable input to a pipeline run

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Request validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown channel '{0}'. Valid channels: {valid}", valid = CampaignChannel::valid_list())]
    UnknownChannel(String),

    #[error("Unknown tone '{0}'. Valid tones: {valid}", valid = CopyTone::valid_list())]
    UnknownTone(String),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("At least one channel is required")]
    NoChannels,

    #[error("Channel '{0}' is listed more than once")]
    DuplicateChannel(CampaignChannel),
}

/// Marketing channel a campaign targets
///
/// Deserialization goes through [`FromStr`](std::str::FromStr), so files and
/// interactive input share one case-insensitive parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum CampaignChannel {
    SocialMedia,
    Email,
    DisplayAds,
    Influencer,
    ContentMarketing,
    Video,
    SearchAds,
    Affiliate,
}

impl CampaignChannel {
    pub const ALL: [CampaignChannel; 8] = [
        Self::SocialMedia,
        Self::Email,
        Self::DisplayAds,
        Self::Influencer,
        Self::ContentMarketing,
        Self::Video,
        Self::SearchAds,
        Self::Affiliate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SocialMedia => "social_media",
            Self::Email => "email",
            Self::DisplayAds => "display_ads",
            Self::Influencer => "influencer",
            Self::ContentMarketing => "content_marketing",
            Self::Video => "video",
            Self::SearchAds => "search_ads",
            Self::Affiliate => "affiliate",
        }
    }

    /// Comma-separated list of every wire name
    pub fn valid_list() -> String {
        Self::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
    }

    /// Parse a comma-separated channel list, rejecting unknown tokens
    ///
    /// Blank tokens are skipped.
    pub fn parse_list(raw: &str) -> Result<Vec<CampaignChannel>, ValidationError> {
        debug!(%raw, "CampaignChannel::parse_list: called");
        Self::collect_unique(raw.split(',').map(str::trim).filter(|t| !t.is_empty()))
    }

    /// Parse channel names into a set, keeping first-occurrence order
    pub fn collect_unique<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Vec<CampaignChannel>, ValidationError> {
        let mut channels = Vec::new();
        for name in names {
            let channel: CampaignChannel = name.parse()?;
            if !channels.contains(&channel) {
                channels.push(channel);
            }
        }
        if channels.is_empty() {
            return Err(ValidationError::NoChannels);
        }
        Ok(channels)
    }
}

impl std::fmt::Display for CampaignChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CampaignChannel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownChannel(s.trim().to_string()))
    }
}

impl TryFrom<String> for CampaignChannel {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Brand voice for the copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum CopyTone {
    #[default]
    Professional,
    Casual,
    Playful,
    Luxury,
    Educational,
    Motivational,
    Technical,
    Friendly,
}

impl CopyTone {
    pub const ALL: [CopyTone; 8] = [
        Self::Professional,
        Self::Casual,
        Self::Playful,
        Self::Luxury,
        Self::Educational,
        Self::Motivational,
        Self::Technical,
        Self::Friendly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Playful => "playful",
            Self::Luxury => "luxury",
            Self::Educational => "educational",
            Self::Motivational => "motivational",
            Self::Technical => "technical",
            Self::Friendly => "friendly",
        }
    }

    pub fn valid_list() -> String {
        Self::ALL.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl std::fmt::Display for CopyTone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CopyTone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownTone(s.trim().to_string()))
    }
}

impl TryFrom<String> for CopyTone {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Everything the agents know about the campaign being planned
///
/// Built once (interactively, from a file, or the demo preset) and never
/// mutated afterwards; every stage reads the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRequest {
    pub product_name: String,
    pub product_description: String,
    pub target_audience: String,
    pub campaign_goals: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,

    pub channels: Vec<CampaignChannel>,

    #[serde(default)]
    pub brand_voice: CopyTone,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
}

impl CampaignRequest {
    /// Check the invariants the pipeline relies on
    pub fn validate(&self) -> Result<(), ValidationError> {
        debug!(product = %self.product_name, "CampaignRequest::validate: called");
        if self.product_name.trim().is_empty() {
            return Err(ValidationError::EmptyField("product_name"));
        }
        if self.channels.is_empty() {
            return Err(ValidationError::NoChannels);
        }
        for (i, channel) in self.channels.iter().enumerate() {
            if self.channels[..i].contains(channel) {
                return Err(ValidationError::DuplicateChannel(*channel));
            }
        }
        Ok(())
    }

    /// Channels as a comma-separated wire-name list
    pub fn channel_list(&self) -> String {
        self.channels.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
    }

    /// Load a request from a YAML or JSON file and validate it
    ///
    /// JSON is a subset of YAML, so a single parser handles both. Channel and
    /// tone names get the same treatment as interactive answers: unknown
    /// names are a [`ValidationError`] and repeated channels collapse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RequestFileError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "CampaignRequest::load: called");
        let content = fs::read_to_string(path).map_err(|source| RequestFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RequestFile = serde_yaml::from_str(&content).map_err(|source| RequestFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let request = Self::try_from(file)?;
        request.validate()?;
        Ok(request)
    }

    /// The built-in AeroFlow Pro sample
    pub fn demo() -> Self {
        Self {
            product_name: "AeroFlow Pro".to_string(),
            product_description: "A smart, AI-powered air purifier that learns your air-quality \
                preferences, adapts to pollen and pollution levels in real time, \
                and integrates with smart-home ecosystems like Alexa and Google Home."
                .to_string(),
            target_audience: "Health-conscious millennials and Gen-Z professionals aged 25-38 \
                living in urban apartments who value clean air, modern design \
                aesthetics, and smart-home technology."
                .to_string(),
            campaign_goals: "Drive 10,000 pre-orders in 60 days via Kickstarter, build brand \
                awareness among target demographic, achieve 5% social-media \
                engagement rate."
                .to_string(),
            budget_range: Some("$50,000 - $100,000".to_string()),
            channels: vec![
                CampaignChannel::SocialMedia,
                CampaignChannel::Email,
                CampaignChannel::DisplayAds,
                CampaignChannel::Influencer,
            ],
            brand_voice: CopyTone::Professional,
            additional_context: Some(
                "Launching on Kickstarter first, then moving to D2C website. \
                Key competitors include Dyson Pure Cool, Molekule Air, and \
                Coway Airmega. Our differentiator is the AI-learning feature \
                that adapts to individual preferences over time."
                    .to_string(),
            ),
        }
    }
}

/// Request file as written, with channel and tone names still raw
#[derive(Debug, Deserialize)]
struct RequestFile {
    product_name: String,
    product_description: String,
    target_audience: String,
    campaign_goals: String,
    #[serde(default)]
    budget_range: Option<String>,
    #[serde(default)]
    channels: Vec<String>,
    #[serde(default)]
    brand_voice: Option<String>,
    #[serde(default)]
    additional_context: Option<String>,
}

impl TryFrom<RequestFile> for CampaignRequest {
    type Error = ValidationError;

    fn try_from(file: RequestFile) -> Result<Self, Self::Error> {
        let channels = CampaignChannel::collect_unique(file.channels.iter().map(String::as_str))?;
        let brand_voice = file.brand_voice.as_deref().map(str::parse::<CopyTone>).transpose()?.unwrap_or_default();
        Ok(Self {
            product_name: file.product_name,
            product_description: file.product_description,
            target_audience: file.target_audience,
            campaign_goals: file.campaign_goals,
            budget_range: file.budget_range,
            channels,
            brand_voice,
            additional_context: file.additional_context,
        })
    }
}

/// Failure loading a request file
#[derive(Debug, Error)]
pub enum RequestFileError {
    #[error("Failed to read request file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse request file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
