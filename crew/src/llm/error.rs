//! Model API errors

use std::time::Duration;
use thiserror::Error;

/// Failure talking to the model provider
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Model provider rate limit reached (retry after {}s)", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("Model API returned HTTP {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Could not reach the model API: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unusable model response: {0}")]
    InvalidResponse(String),

    #[error("Malformed JSON from the model API: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// HTTP status behind the error, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::ApiError { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidResponse(_) | Self::Json(_) => None,
        }
    }

    /// Whether the client may resend the same request
    ///
    /// Request timeouts, server errors, rate limits and dropped connections
    /// qualify; a bad request or an unusable body never does.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Network(_) => true,
            Self::ApiError { status, .. } => *status == 408 || *status >= 500,
            Self::InvalidResponse(_) | Self::Json(_) => false,
        }
    }

    /// Rejected key, exhausted quota, or forbidden model
    pub fn is_credential_error(&self) -> bool {
        matches!(self.status(), Some(401 | 402 | 403))
    }
}
