//! SkillGap - AI-powered skill assessment analyzer
//!
//! A CLI tool that groups a candidate's assessment responses by skill
//! and asks a chat-completion model for a strengths/gaps summary.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing input, malformed record, config, I/O)
//!   2 - The model call produced no analysis result

mod analysis;
mod analyzer;
mod cli;
mod config;
mod input;
mod models;
mod prompt;
mod report;
#[cfg(test)]
mod test_support;

use analyzer::RemoteAnalyzer;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use models::{ReportMetadata, SkillSummary};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let (config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("SkillGap v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration source: {}", config_source);

    match run_analysis(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .skillgap.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!(
        "✅ Created {} with default settings.",
        config::DEFAULT_CONFIG_FILE
    );
    println!(
        "   Credentials are read from {} and {}.",
        config::ENDPOINT_ENV,
        config::API_KEY_ENV
    );
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Log lines go to stderr so stdout carries only the prompt and the result.
fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = build_subscriber(level, std::io::stderr);
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn build_subscriber<W>(level: tracing::Level, writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(writer)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish()
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Returns the config and a description of where it came from.
fn load_config(args: &Args) -> Result<(Config, String)> {
    let (mut config, source) = if let Some(ref config_path) = args.config {
        (
            Config::load(config_path)?,
            config_path.display().to_string(),
        )
    } else {
        match Config::load_default()? {
            Some(config) => (config, config::DEFAULT_CONFIG_FILE.to_string()),
            None => (Config::default(), "defaults".to_string()),
        }
    };

    config.merge_with_args(args);
    config.validate()?;

    Ok((config, source))
}

/// Run one analysis pass. Returns the exit code (0 or 2).
async fn run_analysis(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    // Credentials are checked before any work is done
    let analyzer_config = if args.needs_remote() {
        Some(config.analyzer_config()?)
    } else {
        None
    };

    // Step 1: Load and aggregate responses
    let input_path = PathBuf::from(&config.general.input);
    if !args.show_prompt {
        println!("📂 Reading responses: {}", input_path.display());
    }

    let records = input::load_records(&input_path)?;
    let summary = analysis::aggregate_responses(&records);

    info!(
        "Aggregated {} records: {} titles, {} categories, {} skills",
        records.len(),
        summary.job_titles.len(),
        summary.categories.len(),
        summary.skills.len()
    );

    // Step 2: Build the prompt
    let generated_prompt = prompt::build_prompt(&summary);

    if args.show_prompt {
        println!("{}", generated_prompt);
        return Ok(0);
    }

    if let Some(ref path) = args.save_prompt {
        std::fs::write(path, &generated_prompt)
            .with_context(|| format!("Failed to write prompt to {}", path.display()))?;
        println!("📝 Prompt saved to {}", path.display());
        println!(
            "   Edit it, then run again with --prompt-file {}",
            path.display()
        );
        return Ok(0);
    }

    let prompt_text = match args.prompt_file {
        Some(ref path) => read_prompt_file(path)?,
        None => generated_prompt,
    };

    let analyzer_config = match analyzer_config {
        Some(c) => c,
        None => bail!("No analyzer configuration available"),
    };

    // Step 3: Call the model
    println!("\n📊 Responses:");
    println!("   Records: {}", records.len());
    if !summary.skills.is_empty() {
        println!("{}", report::generate_skill_table(&summary));
    }

    println!("\n🤖 Analyzing...");
    println!("   Endpoint: {}", analyzer_config.endpoint_host());

    let analyzer = RemoteAnalyzer::new(analyzer_config);
    let output_path = PathBuf::from(&config.general.output);
    let run = RunContext {
        input_path: &input_path,
        records: records.len(),
        custom_prompt: args.prompt_file.is_some(),
    };

    let outcome = analyze_and_save(
        &analyzer,
        &prompt_text,
        &summary,
        &run,
        args.format,
        &output_path,
        !args.quiet,
    )
    .await?;

    match outcome {
        Some(analysis) => {
            println!("\n📋 Analysis Result:\n");
            println!("{}", analysis);
            println!(
                "\n✅ Analysis complete in {:.1}s. Saved to: {}",
                start_time.elapsed().as_secs_f64(),
                output_path.display()
            );
            Ok(0)
        }
        None => {
            eprintln!("\n⚠️  No analysis result available.");
            Ok(2)
        }
    }
}

/// Details about the run recorded in the JSON report.
struct RunContext<'a> {
    input_path: &'a Path,
    records: usize,
    custom_prompt: bool,
}

/// Submit the prompt and, on success, overwrite the output artifact.
///
/// Returns `Ok(None)` when the model produced no result; the artifact is
/// left untouched in that case.
async fn analyze_and_save(
    analyzer: &RemoteAnalyzer,
    prompt: &str,
    summary: &SkillSummary,
    run: &RunContext<'_>,
    format: OutputFormat,
    output_path: &Path,
    show_progress: bool,
) -> Result<Option<String>> {
    let spinner = start_spinner(show_progress);
    let result = analyzer.try_analyze(prompt).await;
    spinner.finish_and_clear();

    let Some(analysis) = result else {
        warn!("No analysis result; {} not written", output_path.display());
        return Ok(None);
    };

    let metadata = ReportMetadata {
        input_path: run.input_path.display().to_string(),
        analysis_date: Utc::now(),
        endpoint_host: analyzer.config().endpoint_host().to_string(),
        records: run.records,
        custom_prompt: run.custom_prompt,
    };
    let report = report::build_report(summary, metadata, &analysis);
    let content = report::render_artifact(&report, format)?;
    report::write_artifact(output_path, &content)?;
    debug!("Wrote {} bytes to {}", content.len(), output_path.display());

    Ok(Some(analysis))
}

/// Read an edited prompt; an empty file is rejected.
fn read_prompt_file(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read prompt file {}", path.display()))?;

    if text.trim().is_empty() {
        bail!("Prompt file {} is empty", path.display());
    }

    info!("Using prompt from {}", path.display());
    Ok(text)
}

fn start_spinner(show_progress: bool) -> ProgressBar {
    if !show_progress {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Waiting for the model...");
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
