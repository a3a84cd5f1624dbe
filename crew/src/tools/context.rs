//! ToolContext - execution context for tools

use reqwest::Client;
use tracing::debug;

use super::ToolError;
use crate::config::SearchCredentials;

/// Serper credentials plus the client that talks to it
#[derive(Debug, Clone)]
pub struct LiveSearch {
    pub credentials: SearchCredentials,
    pub http: Client,
}

/// Execution context shared by every tool call in a run
///
/// Built once from configuration and handed to the invoker; tools hold no
/// state of their own.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// `None` means trend research uses the simulated dataset
    pub search: Option<LiveSearch>,
}

impl ToolContext {
    /// Create a context, building the search client when credentials are present
    pub fn new(search: Option<SearchCredentials>) -> Result<Self, ToolError> {
        debug!(live_search = %search.is_some(), "ToolContext::new: called");
        let search = match search {
            Some(credentials) => {
                let http = Client::builder()
                    .timeout(credentials.timeout)
                    .build()
                    .map_err(ToolError::HttpClient)?;
                Some(LiveSearch { credentials, http })
            }
            None => None,
        };
        Ok(Self { search })
    }

    /// Context with no external access
    pub fn offline() -> Self {
        Self::default()
    }
}
