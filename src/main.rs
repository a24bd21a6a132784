use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use wiggum::cli::Cli;
use wiggum::process::{ProcessHost, ScriptedHost, TokioProcessHost};
use wiggum::runner::{COMPLETION_MARKER, LoopController, LoopResult};
use wiggum::state::StateStore;

/// Env var that swaps the real agent for a canned completing run, so the
/// loop can be exercised end-to-end without any agent binary installed.
const TEST_MODE_VAR: &str = "RALPH_TEST_MODE";

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wiggum")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("wiggum.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_loop<H: ProcessHost>(cli: &Cli, host: Arc<H>) -> Result<LoopResult> {
    let store = StateStore::new(&cli.dir)
        .with_context(|| format!("Cannot use working directory {}", cli.dir.display()))?;
    let config = cli.run_config();

    if cli.verbose {
        println!(
            "{} tool={} prompt={} max_iterations={}",
            "Config:".yellow(),
            config.tool,
            config.prompt_file.display(),
            config.max_iterations
        );
    }

    let controller = LoopController::new(store, host, config);
    controller.run().await.context("Loop failed")
}

fn print_summary(result: &LoopResult) {
    if result.completed {
        println!(
            "{} after {} iteration(s)",
            "Completed".green().bold(),
            result.iterations_run
        );
    } else {
        println!(
            "{} after {} iteration(s) without a completion marker",
            "Exhausted".red().bold(),
            result.iterations_run
        );
    }
    if result.spawn_failures > 0 {
        println!(
            "{} {} iteration(s) failed to spawn the agent",
            "Warning:".yellow(),
            result.spawn_failures
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();

    let result = if std::env::var(TEST_MODE_VAR).as_deref() == Ok("complete") {
        info!("{}=complete, using scripted agent", TEST_MODE_VAR);
        let host = Arc::new(ScriptedHost::always(format!(
            "Test mode run\n{}\n",
            COMPLETION_MARKER
        )));
        run_loop(&cli, host).await?
    } else {
        run_loop(&cli, Arc::new(TokioProcessHost)).await?
    };

    print_summary(&result);

    // The reference scripts always exited 0; exiting 1 on exhaustion is a
    // deliberate deviation for scripting ergonomics.
    if !result.completed {
        std::process::exit(1);
    }
    Ok(())
}
