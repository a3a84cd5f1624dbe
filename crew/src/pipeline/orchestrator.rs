//! Orchestrator: drives the four stages in order and assembles the brief
//!
//! Stages run strictly one after another. The first failure aborts the run;
//! nothing is persisted unless every stage succeeded.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::{CHAIN, PipelineState, ProgressEvent};
use crate::agents::AgentInvoker;
use crate::brief::{BriefStore, PersistenceError, SavedBrief, assemble};
use crate::domain::{CampaignBrief, CampaignRequest, StageKind, StageResult, ValidationError};
use crate::llm::LlmError;
use crate::prompts::PromptLoader;
use crate::tasks::{TaskError, TaskFactory};

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to build the {stage} task: {source}")]
    Task {
        stage: StageKind,
        #[source]
        source: TaskError,
    },

    #[error("Stage {stage} failed (last completed state: {reached}): {source}")]
    Stage {
        stage: StageKind,
        reached: PipelineState,
        #[source]
        source: LlmError,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl PipelineError {
    /// Stage that failed, if the failure happened inside the chain
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            Self::Task { stage, .. } | Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Model error behind a stage failure
    pub fn llm_error(&self) -> Option<&LlmError> {
        match self {
            Self::Stage { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Sequential stage runner
pub struct Orchestrator {
    invoker: Arc<dyn AgentInvoker>,
    prompts: PromptLoader,
    progress: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl Orchestrator {
    pub fn new(invoker: Arc<dyn AgentInvoker>, prompts: PromptLoader) -> Self {
        Self {
            invoker,
            prompts,
            progress: None,
        }
    }

    /// Report stage start/finish events on `tx`
    pub fn with_progress(mut self, tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        self.progress = Some(tx);
        self
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.progress {
            // A dropped receiver only means nobody is watching
            let _ = tx.send(event);
        }
    }

    /// Run all four stages and assemble the brief
    pub async fn run(&self, request: &CampaignRequest) -> Result<CampaignBrief, PipelineError> {
        debug!(product = %request.product_name, "Orchestrator::run: called");
        request.validate()?;

        let run_id = Uuid::now_v7().to_string();
        info!(%run_id, product = %request.product_name, channels = %request.channel_list(), "Starting campaign run");

        let factory = TaskFactory::new(&self.prompts);
        let mut results: Vec<StageResult> = Vec::with_capacity(CHAIN.len());
        let mut state = PipelineState::Pending;

        for spec in &CHAIN {
            let agent = spec.role.descriptor();
            let task = factory
                .build_task(spec, request, &results)
                .map_err(|source| PipelineError::Task {
                    stage: spec.kind,
                    source,
                })?;

            self.emit(ProgressEvent::StageStarted {
                stage: spec.kind,
                agent: agent.title,
            });
            info!(%run_id, stage = %spec.kind, agent = %agent.title, "Stage started");
            let started = Instant::now();

            let output = self.invoker.invoke(agent, &task).await.map_err(|source| {
                error!(%run_id, stage = %spec.kind, reached = %state, error = %source, "Stage failed");
                PipelineError::Stage {
                    stage: spec.kind,
                    reached: state,
                    source,
                }
            })?;
            drop(task);

            let elapsed = started.elapsed();
            let output_chars = output.chars().count();
            results.push(StageResult::new(spec.kind, agent.title, output));
            state = PipelineState::after(spec.kind);

            info!(%run_id, stage = %spec.kind, output_chars, elapsed_ms = elapsed.as_millis() as u64, "Stage completed");
            self.emit(ProgressEvent::StageCompleted {
                stage: spec.kind,
                agent: agent.title,
                output_chars,
                elapsed,
            });
        }

        debug!(%run_id, %state, "Orchestrator::run: all stages done");
        Ok(assemble(request, &results, run_id, Utc::now()))
    }

    /// Run the pipeline and persist the brief only on success
    pub async fn run_and_save(
        &self,
        request: &CampaignRequest,
        store: &BriefStore,
    ) -> Result<(CampaignBrief, SavedBrief), PipelineError> {
        debug!(dir = %store.dir().display(), "Orchestrator::run_and_save: called");
        let brief = self.run(request).await?;
        let saved = store.save(&brief)?;
        Ok((brief, saved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentDescriptor;
    use crate::domain::{CampaignChannel, StageTask};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records calls and fails at a chosen stage
    struct StubInvoker {
        fail_at: Option<StageKind>,
        calls: Mutex<Vec<(StageKind, String, usize)>>,
    }

    impl StubInvoker {
        fn new(fail_at: Option<StageKind>) -> Self {
            Self {
                fail_at,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(StageKind, String, usize)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AgentInvoker for StubInvoker {
        async fn invoke(&self, agent: &AgentDescriptor, task: &StageTask<'_>) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((task.stage, agent.title.to_string(), task.context.len()));
            if self.fail_at == Some(task.stage) {
                return Err(LlmError::ApiError {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(format!("{} output", task.stage))
        }
    }

    fn orchestrator(stub: Arc<StubInvoker>) -> Orchestrator {
        Orchestrator::new(stub, PromptLoader::embedded_only())
    }

    #[tokio::test]
    async fn test_stages_run_in_order() {
        let stub = Arc::new(StubInvoker::new(None));
        let brief = orchestrator(stub.clone()).run(&CampaignRequest::demo()).await.unwrap();

        let calls = stub.calls();
        let stages: Vec<_> = calls.iter().map(|c| c.0).collect();
        assert_eq!(stages, StageKind::ALL.to_vec());
        let context_sizes: Vec<_> = calls.iter().map(|c| c.2).collect();
        assert_eq!(context_sizes, vec![0, 1, 2, 3]);

        assert_eq!(brief.final_recommendations, "management output");
        assert_eq!(brief.transcript.len(), 4);
        assert!(Uuid::parse_str(&brief.run_id).is_ok());
    }

    #[tokio::test]
    async fn test_failure_at_each_stage_aborts_without_files() {
        for (idx, failing) in StageKind::ALL.iter().enumerate() {
            let temp = TempDir::new().unwrap();
            let store = BriefStore::new(temp.path().join("out"));
            let stub = Arc::new(StubInvoker::new(Some(*failing)));

            let result = orchestrator(stub.clone())
                .run_and_save(&CampaignRequest::demo(), &store)
                .await;

            match result {
                Err(PipelineError::Stage { stage, reached, .. }) => {
                    assert_eq!(stage, *failing);
                    let expected = if idx == 0 {
                        PipelineState::Pending
                    } else {
                        PipelineState::after(StageKind::ALL[idx - 1])
                    };
                    assert_eq!(reached, expected);
                }
                other => panic!("expected stage failure, got {:?}", other.map(|_| ())),
            }
            assert_eq!(stub.calls().len(), idx + 1);
            assert!(!temp.path().join("out").exists());
        }
    }

    #[tokio::test]
    async fn test_invalid_request_never_invokes() {
        let stub = Arc::new(StubInvoker::new(None));
        let mut request = CampaignRequest::demo();
        request.channels.clear();

        let result = orchestrator(stub.clone()).run(&request).await;
        assert!(matches!(result, Err(PipelineError::Validation(ValidationError::NoChannels))));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_progress_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stub = Arc::new(StubInvoker::new(None));
        let mut request = CampaignRequest::demo();
        request.channels = vec![CampaignChannel::Email];

        orchestrator(stub).with_progress(tx).run(&request).await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(events.len(), 8);
        assert!(matches!(
            events[0],
            ProgressEvent::StageStarted {
                stage: StageKind::Research,
                ..
            }
        ));
        assert!(matches!(
            events[7],
            ProgressEvent::StageCompleted {
                stage: StageKind::Management,
                output_chars: 17,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_run_and_save_writes_brief() {
        let temp = TempDir::new().unwrap();
        let store = BriefStore::new(temp.path());
        let stub = Arc::new(StubInvoker::new(None));

        let (brief, saved) = orchestrator(stub)
            .run_and_save(&CampaignRequest::demo(), &store)
            .await
            .unwrap();

        assert!(saved.markdown_path.exists());
        let loaded = BriefStore::load(&saved.json_path).unwrap();
        assert_eq!(loaded.final_recommendations, brief.final_recommendations);
    }

    #[test]
    fn test_stage_error_message() {
        let err = PipelineError::Stage {
            stage: StageKind::Copywriting,
            reached: PipelineState::ResearchDone,
            source: LlmError::RateLimited {
                retry_after: std::time::Duration::from_secs(5),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("copywriting"));
        assert!(msg.contains("research_done"));
        assert_eq!(err.stage(), Some(StageKind::Copywriting));
    }
}
