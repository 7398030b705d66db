//! verdict CLI entry point.
//!
//! Wires task packs, models and the local inference endpoint into one
//! sequential benchmark run. Setup failures (unreadable pack directory,
//! unwritable output directory) abort with a non-zero exit; generation
//! and validation failures are per-task outcomes and never do.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use verdict_core::load_pack;
use verdict_runtime::{GenerateOptions, Harness, OllamaClient, Reporter};

#[derive(Parser, Debug)]
#[command(name = "verdict", version, about = "Local LLM benchmark harness")]
struct Cli {
    /// Comma-separated model names (as listed by `ollama list`)
    #[arg(long, required = true, value_delimiter = ',')]
    models: Vec<String>,

    /// Directory with YAML task packs (e.g. packs/core)
    #[arg(long)]
    packs: PathBuf,

    /// Output directory for CSV, summary and artifacts
    #[arg(long, default_value = "results")]
    outdir: PathBuf,

    /// Maximum tokens per generation call
    #[arg(long, default_value_t = 4096)]
    max_tokens: u32,

    /// Per-call timeout in seconds
    #[arg(long, default_value_t = 180)]
    timeout: u64,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.0)]
    temperature: f32,

    /// Base URL of the inference endpoint
    #[arg(long, default_value = "http://localhost:11434")]
    base_url: String,

    /// Save prompts and raw model outputs to JSONL and per-task .txt files
    #[arg(long)]
    save_outputs: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone());
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)))
        .init();

    let models: Vec<String> = cli
        .models
        .iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    anyhow::ensure!(!models.is_empty(), "no model names given");

    let tasks = load_pack(&cli.packs)
        .with_context(|| format!("loading task packs from {}", cli.packs.display()))?;
    anyhow::ensure!(
        !tasks.is_empty(),
        "no task packs found in {}",
        cli.packs.display()
    );
    tracing::info!(tasks = tasks.len(), models = models.len(), "starting run");

    let run_id = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let options = GenerateOptions {
        temperature: cli.temperature,
        max_tokens: cli.max_tokens,
        timeout: Duration::from_secs(cli.timeout),
    };

    let client = Arc::new(OllamaClient::with_base_url(&cli.base_url));
    let harness = Harness::new(client, options, run_id.clone());
    let mut reporter = Reporter::new(&cli.outdir, run_id, cli.save_outputs)
        .with_context(|| format!("preparing output directory {}", cli.outdir.display()))?;

    harness.run(&tasks, &models, &mut reporter).await?;
    let paths = reporter.finish()?;

    if let Some(raw) = &paths.raw {
        println!("Wrote raw outputs: {}", raw.display());
    }
    if let Some(outputs) = &paths.outputs {
        println!("Saved per-task .txt files under: {}", outputs.display());
    }
    println!("\nWrote CSV: {}\nWrote summary: {}", paths.csv.display(), paths.summary.display());

    Ok(())
}
