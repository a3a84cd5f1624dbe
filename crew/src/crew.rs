//! CampaignCrew: wires config, model client, tools, and orchestrator together

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::agents::{AgentInvoker, ToolLoopInvoker};
use crate::brief::{BriefStore, SavedBrief};
use crate::config::Config;
use crate::domain::{CampaignBrief, CampaignRequest};
use crate::error::CampaignError;
use crate::llm::create_client;
use crate::pipeline::{Orchestrator, ProgressEvent};
use crate::prompts::PromptLoader;
use crate::tools::{ToolContext, ToolExecutor};

/// A fully configured campaign pipeline
pub struct CampaignCrew {
    invoker: Arc<dyn AgentInvoker>,
    prompts_dir: Option<std::path::PathBuf>,
    store: BriefStore,
}

impl CampaignCrew {
    /// Build the production pipeline from configuration
    ///
    /// Fails before any model call when the credential is missing.
    pub fn from_config(config: &Config) -> Result<Self, CampaignError> {
        debug!(provider = %config.llm.provider, model = %config.llm.model, "CampaignCrew::from_config: called");
        config.validate()?;

        let llm = create_client(&config.llm)?;
        let prompts = PromptLoader::new(config.prompts.dir.as_deref());
        let ctx = ToolContext::new(config.search.credentials())?;
        if ctx.search.is_none() {
            info!("No search credential configured, trend research will use simulated data");
        }

        let invoker = ToolLoopInvoker::new(llm, ToolExecutor::builtin(), ctx, &prompts, config.llm.max_tokens)?;
        Ok(Self {
            invoker: Arc::new(invoker),
            prompts_dir: config.prompts.dir.clone(),
            store: BriefStore::new(&config.output.dir),
        })
    }

    /// Build a pipeline around a custom invoker
    pub fn with_invoker(invoker: Arc<dyn AgentInvoker>, prompts_dir: Option<&Path>, output_dir: &Path) -> Self {
        Self {
            invoker,
            prompts_dir: prompts_dir.map(Path::to_path_buf),
            store: BriefStore::new(output_dir),
        }
    }

    pub fn store(&self) -> &BriefStore {
        &self.store
    }

    fn orchestrator(&self, progress: Option<mpsc::UnboundedSender<ProgressEvent>>) -> Orchestrator {
        let prompts = PromptLoader::new(self.prompts_dir.as_deref());
        let orchestrator = Orchestrator::new(self.invoker.clone(), prompts);
        match progress {
            Some(tx) => orchestrator.with_progress(tx),
            None => orchestrator,
        }
    }

    /// Run the four stages and save the brief
    pub async fn run(
        &self,
        request: &CampaignRequest,
        progress: Option<mpsc::UnboundedSender<ProgressEvent>>,
    ) -> Result<(CampaignBrief, SavedBrief), CampaignError> {
        debug!(product = %request.product_name, "CampaignCrew::run: called");
        let result = self.orchestrator(progress).run_and_save(request, &self.store).await?;
        Ok(result)
    }
}
