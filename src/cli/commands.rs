//! CLI definition using clap.
//!
//! The reference shell scripts silently ignored unknown flags and let the
//! last bare integer win. This parser is deliberately stricter: unknown
//! flags are a usage error and only one iteration count is accepted. The
//! resolved configuration is a pure function of the parsed arguments.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOOL, RunConfig, default_prompt_file};

/// Wiggum - run an AI coding agent in a loop until it reports completion
#[derive(Parser, Debug)]
#[command(name = "wiggum")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Maximum number of iterations
    #[arg(value_name = "ITERATIONS")]
    pub iterations: Option<u32>,

    /// Agent binary to run each iteration (amp, claude, cursor, ...)
    #[arg(long, default_value = DEFAULT_TOOL)]
    pub tool: String,

    /// Extra argument forwarded to the agent binary (repeatable)
    #[arg(long = "tool-args", value_name = "ARG", allow_hyphen_values = true)]
    pub tool_args: Vec<String>,

    /// Prompt file fed to the agent on stdin (default depends on --tool)
    #[arg(long, value_name = "PATH")]
    pub prompt_file: Option<PathBuf>,

    /// Base working directory holding prd.json, progress.txt and archive/
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the parsed arguments into a run configuration.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            tool: self.tool.clone(),
            max_iterations: self.iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            prompt_file: self
                .prompt_file
                .clone()
                .unwrap_or_else(|| default_prompt_file(&self.tool)),
            tool_args: self.tool_args.clone(),
        }
    }
}
