//! Tool error types

use thiserror::Error;

/// Errors that can occur during tool execution
///
/// Call-time errors never abort a run; they are reported back to the model as
/// error results. `HttpClient` only arises while building the [`super::ToolContext`].
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tool not found: {name}")]
    UnknownTool { name: String },

    #[error("Tool '{name}' is not available to the {agent}")]
    NotGranted { name: String, agent: String },

    #[error("Search request failed: {0}")]
    Search(String),

    #[error("Failed to build search HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_granted_message() {
        let err = ToolError::NotGranted {
            name: "copy_evaluator".to_string(),
            agent: "Senior Art Director".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("copy_evaluator"));
        assert!(msg.contains("Senior Art Director"));
    }
}
