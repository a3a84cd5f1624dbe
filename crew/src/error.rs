//! Crate-level error aggregate

use thiserror::Error;

use crate::brief::PersistenceError;
use crate::config::ConfigError;
use crate::domain::{RequestFileError, ValidationError};
use crate::llm::{ClientSetupError, LlmError};
use crate::pipeline::PipelineError;
use crate::prompts::PromptError;
use crate::tools::ToolError;

/// Any failure surfaced by [`crate::CampaignCrew`]
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    RequestFile(#[from] RequestFileError),

    #[error("Failed to set up model client: {0}")]
    ClientSetup(#[from] ClientSetupError),

    #[error("Failed to set up tools: {0}")]
    ToolSetup(#[from] ToolError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Failed to save brief: {0}")]
    Persistence(#[from] PersistenceError),
}

impl CampaignError {
    /// Model error behind a failed stage, if any
    pub fn llm_error(&self) -> Option<&LlmError> {
        match self {
            Self::Pipeline(e) => e.llm_error(),
            _ => None,
        }
    }

    /// Hint printed below the error in the CLI
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Config(ConfigError::MissingCredential { .. })
            | Self::ClientSetup(ClientSetupError::Config(ConfigError::MissingCredential { .. })) => {
                Some("Export the API key (e.g. GROQ_API_KEY) or set llm.api-key-env in the config file")
            }
            Self::Validation(_) | Self::RequestFile(_) | Self::Pipeline(PipelineError::Validation(_)) => Some("Check the request fields and try again"),
            _ => match self.llm_error() {
                Some(e) if e.is_credential_error() => Some("The provider rejected the API key or quota"),
                Some(LlmError::RateLimited { .. }) => Some("Rate limited by the provider; wait and try again"),
                Some(LlmError::Network(_)) => Some("Check your network connection and llm.base-url"),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StageKind;
    use crate::pipeline::PipelineState;

    #[test]
    fn test_from_conversions() {
        let err: CampaignError = ValidationError::NoChannels.into();
        assert!(matches!(err, CampaignError::Validation(_)));

        let err: CampaignError = ConfigError::MissingCredential {
            var: "GROQ_API_KEY".to_string(),
        }
        .into();
        assert!(err.to_string().contains("GROQ_API_KEY"));
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_credential_hint_from_stage_failure() {
        let err: CampaignError = PipelineError::Stage {
            stage: StageKind::Research,
            reached: PipelineState::Pending,
            source: LlmError::ApiError {
                status: 401,
                message: "invalid api key".to_string(),
            },
        }
        .into();
        assert!(err.llm_error().is_some());
        assert_eq!(err.hint(), Some("The provider rejected the API key or quota"));
    }
}
