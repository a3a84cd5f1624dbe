//! campaigncrew - multi-agent marketing campaign briefs
//!
//! CLI entry point: gathers a campaign request, runs the four-agent crew,
//! and reports where the brief was written.

use std::fs;
use std::path::Path;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use campaigncrew::brief::truncate_chars;
use campaigncrew::cli::{Cli, Command, ToolCommand, generate_after_help, get_log_path};
use campaigncrew::config::Config;
use campaigncrew::domain::{CampaignRequest, StageKind};
use campaigncrew::intake;
use campaigncrew::llm::ToolCall;
use campaigncrew::pipeline::ProgressEvent;
use campaigncrew::tools::{ToolContext, ToolExecutor};
use campaigncrew::{CampaignCrew, CampaignError};

/// Characters of the executive summary echoed to the terminal
const SUMMARY_PREVIEW_CHARS: usize = 800;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real environment variables win over it
    let dotenv_path = dotenvy::dotenv().ok();

    let defaults = Config::default();
    let cmd = Cli::command().after_help(generate_after_help(
        &defaults.llm.api_key_env,
        &defaults.search.api_key_env,
    ));
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;
    if let Some(path) = &dotenv_path {
        debug!(path = %path.display(), "main: loaded .env");
    }

    let mut config = match Config::load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => fail(&CampaignError::from(e)),
    };
    if let Some(dir) = cli.output_dir {
        debug!(dir = %dir.display(), "main: output dir from CLI");
        config.output.dir = dir;
    }
    info!(provider = %config.llm.provider, model = %config.llm.model, "campaigncrew loaded config");

    // Tools run offline; every other command needs the model before any prompt
    if !matches!(cli.command, Some(Command::Tool { .. }))
        && let Err(e) = config.validate()
    {
        fail(&CampaignError::from(e));
    }

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Tool { command }) => {
            debug!("main: matched Tool command");
            cmd_tool(command).await
        }
        Some(Command::Demo) => {
            debug!("main: matched Demo command");
            cmd_campaign(&config, CampaignRequest::demo()).await
        }
        Some(Command::Run { file }) => {
            debug!(file = %file.display(), "main: matched Run command");
            match CampaignRequest::load(&file) {
                Ok(request) => cmd_campaign(&config, request).await,
                Err(e) => fail(&CampaignError::from(e)),
            }
        }
        Some(Command::New) | None => {
            debug!("main: matched New command");
            cmd_new(&config).await
        }
    }
}

/// Print an error with its hint and exit with status 1
fn fail(err: &CampaignError) -> ! {
    warn!(error = %err, "main: exiting with failure");
    eprintln!("{} {}", "Error:".red().bold(), err);
    if let Some(hint) = err.hint() {
        eprintln!("{} {}", "Hint:".yellow(), hint);
    }
    eprintln!("{} {}", "Logs:".dimmed(), get_log_path().display());
    std::process::exit(1);
}

async fn cmd_tool(command: ToolCommand) -> Result<()> {
    let (name, input) = command.to_call();
    debug!(%name, "cmd_tool: called");
    let executor = ToolExecutor::builtin();
    let call = ToolCall {
        id: "cli".to_string(),
        name: name.to_string(),
        input,
    };
    let result = executor.execute(&call, &[name], "command line", &ToolContext::offline()).await;
    if result.is_error {
        eprintln!("{} {}", "Error:".red().bold(), result.content);
        std::process::exit(1);
    }
    println!("{}", result.content);
    Ok(())
}

async fn cmd_new(config: &Config) -> Result<()> {
    debug!("cmd_new: called");
    // rustyline blocks, so keep it off the async workers
    let gathered = tokio::task::spawn_blocking(intake::gather_request)
        .await
        .context("Interactive intake panicked")?
        .map_err(|e| eyre::eyre!("Failed to read from terminal: {}", e))?;

    match gathered {
        Some(request) => cmd_campaign(config, request).await,
        None => {
            println!("{}", "Cancelled.".dimmed());
            Ok(())
        }
    }
}

fn print_request_summary(request: &CampaignRequest) {
    println!();
    println!("{}", "Campaign Configuration".bright_blue().bold());
    println!("  {:<12} {}", "Product:".cyan().bold(), request.product_name);
    println!("  {:<12} {}", "Audience:", truncate_chars(&request.target_audience, 80));
    println!("  {:<12} {}", "Goals:", truncate_chars(&request.campaign_goals, 80));
    println!("  {:<12} {}", "Channels:", request.channel_list());
    println!("  {:<12} {}", "Tone:", request.brand_voice);
    println!(
        "  {:<12} {}",
        "Budget:",
        request.budget_range.as_deref().unwrap_or("Not specified")
    );
    println!();
}

/// Print progress events until the sender is dropped
async fn print_progress(mut rx: mpsc::UnboundedReceiver<ProgressEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            ProgressEvent::StageStarted { stage, agent } => {
                println!(
                    "{} [{}/{}] {} ({})",
                    "\u{2192}".yellow(),
                    stage.position(),
                    StageKind::ALL.len(),
                    stage.title().bold(),
                    agent
                );
            }
            ProgressEvent::StageCompleted {
                stage,
                output_chars,
                elapsed,
                ..
            } => {
                println!(
                    "{} {} done in {:.1}s ({} chars)",
                    "\u{2713}".green(),
                    stage.title(),
                    elapsed.as_secs_f64(),
                    output_chars
                );
            }
        }
    }
}

async fn cmd_campaign(config: &Config, request: CampaignRequest) -> Result<()> {
    debug!(product = %request.product_name, "cmd_campaign: called");
    print_request_summary(&request);

    let crew = match CampaignCrew::from_config(config) {
        Ok(crew) => crew,
        Err(e) => fail(&e),
    };
    println!("{} Crew assembled: research, copywriter, art director, manager", "\u{2713}".green());
    println!("{}", "Each agent works in turn, building on the previous results.".dimmed());
    println!();

    let (tx, rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_progress(rx));

    let outcome = tokio::select! {
        result = crew.run(&request, Some(tx)) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    // The sender is gone once the run future is dropped
    let _ = printer.await;

    match outcome {
        None => {
            info!("Run cancelled by user");
            println!();
            println!("{}", "Cancelled. No brief was written.".dimmed());
            Ok(())
        }
        Some(Err(e)) => fail(&e),
        Some(Ok((brief, saved))) => {
            println!();
            println!(
                "{}",
                format!("Campaign '{}' completed successfully!", brief.campaign_name)
                    .green()
                    .bold()
            );
            println!();
            println!("{}", "Executive Summary:".bold());
            println!("{}", truncate_chars(&brief.executive_summary, SUMMARY_PREVIEW_CHARS));
            println!();
            print_saved(&saved.markdown_path, &saved.json_path);
            Ok(())
        }
    }
}

fn print_saved(markdown: &Path, json: &Path) {
    println!("{} {}", "Markdown:".dimmed(), markdown.display());
    println!("{} {}", "JSON:".dimmed(), json.display());
}
