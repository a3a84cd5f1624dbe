//! Task Factory
//!
//! Pure mapping from (request, upstream results) to the instruction text for
//! a stage. Never calls the model.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::{CampaignRequest, StageKind, StageResult, StageTask};
use crate::pipeline::StageSpec;
use crate::prompts::{PromptError, PromptLoader};

/// Errors building a stage task
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("Stage {stage} requires the {missing} result, which is not available")]
    MissingUpstream { stage: StageKind, missing: StageKind },
}

/// Template variables shared by all stage templates
#[derive(Debug, Serialize)]
struct TaskContext<'a> {
    product_name: &'a str,
    product_description: &'a str,
    target_audience: &'a str,
    campaign_goals: &'a str,
    budget_range: Option<&'a str>,
    additional_context: Option<&'a str>,
    channels: String,
    brand_voice: &'static str,
    research: Option<&'a str>,
    copy: Option<&'a str>,
    visual: Option<&'a str>,
}

impl<'a> TaskContext<'a> {
    fn from_request(request: &'a CampaignRequest) -> Self {
        let non_blank = |s: &'a Option<String>| s.as_deref().map(str::trim).filter(|s| !s.is_empty());
        Self {
            product_name: &request.product_name,
            product_description: &request.product_description,
            target_audience: &request.target_audience,
            campaign_goals: &request.campaign_goals,
            budget_range: non_blank(&request.budget_range),
            additional_context: non_blank(&request.additional_context),
            channels: request.channel_list(),
            brand_voice: request.brand_voice.as_str(),
            research: None,
            copy: None,
            visual: None,
        }
    }
}

/// Renders stage instructions from templates
pub struct TaskFactory<'p> {
    prompts: &'p PromptLoader,
}

impl<'p> TaskFactory<'p> {
    pub fn new(prompts: &'p PromptLoader) -> Self {
        Self { prompts }
    }

    fn render(&self, stage: StageKind, ctx: &TaskContext<'_>) -> Result<String, PromptError> {
        debug!(%stage, "TaskFactory::render: called");
        self.prompts.render(stage.as_str(), ctx)
    }

    pub fn render_research_task(&self, request: &CampaignRequest) -> Result<String, PromptError> {
        self.render(StageKind::Research, &TaskContext::from_request(request))
    }

    pub fn render_copy_task(&self, request: &CampaignRequest, research: &StageResult) -> Result<String, PromptError> {
        let ctx = TaskContext {
            research: Some(&research.output),
            ..TaskContext::from_request(request)
        };
        self.render(StageKind::Copywriting, &ctx)
    }

    pub fn render_visual_task(
        &self,
        request: &CampaignRequest,
        research: &StageResult,
        copy: &StageResult,
    ) -> Result<String, PromptError> {
        let ctx = TaskContext {
            research: Some(&research.output),
            copy: Some(&copy.output),
            ..TaskContext::from_request(request)
        };
        self.render(StageKind::VisualDirection, &ctx)
    }

    pub fn render_manager_task(
        &self,
        request: &CampaignRequest,
        research: &StageResult,
        copy: &StageResult,
        visual: &StageResult,
    ) -> Result<String, PromptError> {
        let ctx = TaskContext {
            research: Some(&research.output),
            copy: Some(&copy.output),
            visual: Some(&visual.output),
            ..TaskContext::from_request(request)
        };
        self.render(StageKind::Management, &ctx)
    }

    /// Build the task for `spec`, borrowing its required results from `completed`
    pub fn build_task<'a>(
        &self,
        spec: &StageSpec,
        request: &CampaignRequest,
        completed: &'a [StageResult],
    ) -> Result<StageTask<'a>, TaskError> {
        debug!(stage = %spec.kind, completed = completed.len(), "TaskFactory::build_task: called");
        let context = spec
            .requires
            .iter()
            .map(|required| {
                completed
                    .iter()
                    .find(|r| r.stage == *required)
                    .ok_or(TaskError::MissingUpstream {
                        stage: spec.kind,
                        missing: *required,
                    })
            })
            .collect::<Result<Vec<&'a StageResult>, _>>()?;

        let instruction = match (spec.kind, context.as_slice()) {
            (StageKind::Research, []) => self.render_research_task(request)?,
            (StageKind::Copywriting, [research]) => self.render_copy_task(request, research)?,
            (StageKind::VisualDirection, [research, copy]) => self.render_visual_task(request, research, copy)?,
            (StageKind::Management, [research, copy, visual]) => {
                self.render_manager_task(request, research, copy, visual)?
            }
            // A spec whose requirements disagree with its template
            (kind, _) => {
                return Err(TaskError::MissingUpstream {
                    stage: kind,
                    missing: spec.requires.first().copied().unwrap_or(kind),
                });
            }
        };

        Ok(StageTask {
            stage: spec.kind,
            instruction,
            context,
        })
    }
}
