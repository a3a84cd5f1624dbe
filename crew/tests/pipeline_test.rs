//! Integration tests for campaigncrew
//!
//! These tests drive the full pipeline through the public API with a
//! scripted model, so no network access is needed.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use campaigncrew::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage, ToolCall};
use campaigncrew::prompts::PromptLoader;
use campaigncrew::tools::{ToolContext, ToolExecutor};
use campaigncrew::{
    AgentDescriptor, AgentInvoker, BriefStore, CampaignCrew, CampaignError, CampaignRequest, Orchestrator,
    PipelineError, PipelineState, StageKind, StageTask, ToolLoopInvoker,
};
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Replays canned responses and records every request
struct ScriptedLlm {
    responses: Mutex<Vec<Result<CompletionResponse, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    fn new(mut responses: Vec<Result<CompletionResponse, LlmError>>) -> Self {
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(LlmError::InvalidResponse("script exhausted".to_string())))
    }
}

fn text(s: &str) -> Result<CompletionResponse, LlmError> {
    Ok(CompletionResponse::text(s))
}

fn tool_use(name: &str, input: serde_json::Value) -> Result<CompletionResponse, LlmError> {
    Ok(CompletionResponse {
        content: None,
        tool_calls: vec![ToolCall {
            id: format!("call_{name}"),
            name: name.to_string(),
            input,
        }],
        stop_reason: StopReason::ToolUse,
        usage: TokenUsage::default(),
    })
}

fn crew_with(llm: Arc<ScriptedLlm>, output: &std::path::Path) -> CampaignCrew {
    let invoker = ToolLoopInvoker::new(
        llm,
        ToolExecutor::builtin(),
        ToolContext::offline(),
        &PromptLoader::embedded_only(),
        2048,
    )
    .expect("Failed to build invoker");
    CampaignCrew::with_invoker(Arc::new(invoker), None, output)
}

// =============================================================================
// Pipeline Tests
// =============================================================================

#[tokio::test]
async fn test_full_run_with_tool_calls_writes_brief() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let llm = Arc::new(ScriptedLlm::new(vec![
        tool_use("trend_research", serde_json::json!({"query": "air purifiers"})),
        text("RESEARCH: urban buyers want quiet smart devices"),
        tool_use("copy_evaluator", serde_json::json!({"copy_text": "Breathe better. Order now!", "channel": "social_media"})),
        text("COPY: Breathe smarter."),
        text("VISUAL: airy apartment, morning light"),
        text("# Strategy\nLaunch on Kickstarter first."),
    ]));
    let crew = crew_with(llm.clone(), temp_dir.path());

    let (brief, saved) = crew.run(&CampaignRequest::demo(), None).await.expect("Run failed");

    assert_eq!(brief.final_recommendations, "# Strategy\nLaunch on Kickstarter first.");
    assert_eq!(brief.campaign_name, "AeroFlow Pro Campaign");
    assert_eq!(brief.transcript.len(), 4);
    assert_eq!(
        brief.stage_output(StageKind::Copywriting).map(|e| e.output.as_str()),
        Some("COPY: Breathe smarter.")
    );

    // Upstream text reaches the later prompts verbatim
    let requests = llm.requests.lock().unwrap();
    assert_eq!(requests.len(), 6);
    let manager_prompt = requests[5].messages[0].content.as_text().expect("text prompt");
    assert!(manager_prompt.contains("RESEARCH: urban buyers want quiet smart devices"));
    assert!(manager_prompt.contains("VISUAL: airy apartment, morning light"));

    let markdown = std::fs::read_to_string(&saved.markdown_path).expect("markdown written");
    assert!(markdown.contains("Launch on Kickstarter first."));
    let stored = BriefStore::load(&saved.json_path).expect("json written");
    assert_eq!(stored, brief);
}

#[tokio::test]
async fn test_model_failure_midway_saves_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = temp_dir.path().join("briefs");
    let llm = Arc::new(ScriptedLlm::new(vec![
        text("research"),
        text("copy"),
        Err(LlmError::ApiError {
            status: 503,
            message: "overloaded".to_string(),
        }),
    ]));
    let crew = crew_with(llm, &output);

    let err = crew.run(&CampaignRequest::demo(), None).await.unwrap_err();

    match err {
        CampaignError::Pipeline(PipelineError::Stage { stage, reached, .. }) => {
            assert_eq!(stage, StageKind::VisualDirection);
            assert_eq!(reached, PipelineState::CopyDone);
        }
        other => panic!("Expected stage failure, got {other:?}"),
    }
    assert!(!output.exists());
}

/// Echoes the instruction back so the final brief can be inspected
struct EchoInvoker;

#[async_trait]
impl AgentInvoker for EchoInvoker {
    async fn invoke(&self, agent: &AgentDescriptor, task: &StageTask<'_>) -> Result<String, LlmError> {
        Ok(format!("{} saw {} upstream results", agent.title, task.context.len()))
    }
}

#[tokio::test]
async fn test_orchestrator_with_custom_invoker() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = BriefStore::new(temp_dir.path());
    let orchestrator = Orchestrator::new(Arc::new(EchoInvoker), PromptLoader::embedded_only());

    let (brief, saved) = orchestrator
        .run_and_save(&CampaignRequest::demo(), &store)
        .await
        .expect("Run failed");

    assert_eq!(brief.final_recommendations, "Campaign Strategy Director saw 3 upstream results");
    assert!(saved.json_path.starts_with(temp_dir.path()));
    assert!(
        saved
            .markdown_path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("aeroflow_pro_"))
    );
}

#[tokio::test]
async fn test_request_file_round_trip_through_pipeline() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let request_path = temp_dir.path().join("request.yml");
    std::fs::write(
        &request_path,
        "product_name: Lumen Lamp\n\
         product_description: A reading lamp that adapts to daylight\n\
         target_audience: Students\n\
         campaign_goals: 2,000 sales in a month\n\
         channels: [email, video]\n\
         brand_voice: friendly\n",
    )
    .expect("Failed to write request");

    let request = CampaignRequest::load(&request_path).expect("Failed to load request");
    let orchestrator = Orchestrator::new(Arc::new(EchoInvoker), PromptLoader::embedded_only());
    let brief = orchestrator.run(&request).await.expect("Run failed");

    assert_eq!(brief.client_name, "Lumen Lamp");
    assert_eq!(brief.request.channel_list(), "email, video");
}
