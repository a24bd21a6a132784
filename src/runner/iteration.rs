//! Single-iteration execution: spawn the agent, feed the prompt, classify.
//!
//! The completion marker is the external contract with the agent CLI - an
//! exact literal substring, matched case-sensitively with no trimming.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};

use crate::config::RunConfig;
use crate::process::{AgentInvocation, ProcessHost};

/// The literal substring an agent emits to signal the task list is done.
pub const COMPLETION_MARKER: &str = "<promise>COMPLETE</promise>";

/// Whether an output buffer signals completion. Exact substring only; near
/// matches (different case, whitespace inside the tags) do not count.
pub fn is_complete(output: &str) -> bool {
    output.contains(COMPLETION_MARKER)
}

/// Outcome of one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationResult {
    /// 1-based iteration index.
    pub iteration: u32,
    /// Combined stdout+stderr of the agent run; empty on spawn failure.
    pub output: String,
    /// True iff the output contains [`COMPLETION_MARKER`].
    pub completed: bool,
    /// True when the agent binary could not be launched at all. Kept for
    /// observability; a failed spawn is still just a non-completing
    /// iteration.
    pub spawn_failed: bool,
}

/// Runs exactly one iteration against the configured agent binary.
pub struct IterationRunner<H: ProcessHost> {
    host: Arc<H>,
    config: RunConfig,
    base: PathBuf,
}

impl<H: ProcessHost> IterationRunner<H> {
    /// Create a runner for the given host, configuration and base directory.
    pub fn new(host: Arc<H>, config: RunConfig, base: impl AsRef<Path>) -> Self {
        Self {
            host,
            config,
            base: base.as_ref().to_path_buf(),
        }
    }

    /// Prompt file path resolved against the base directory.
    pub fn prompt_path(&self) -> PathBuf {
        if self.config.prompt_file.is_absolute() {
            self.config.prompt_file.clone()
        } else {
            self.base.join(&self.config.prompt_file)
        }
    }

    /// Run one iteration and classify it.
    ///
    /// Never fails: a missing prompt file means empty stdin, and a spawn
    /// error becomes a non-completing result with `spawn_failed` set.
    pub async fn run(&self, iteration: u32) -> IterationResult {
        let prompt_path = self.prompt_path();
        let stdin = match std::fs::read(&prompt_path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                // The agent must tolerate empty stdin.
                debug!(
                    "No prompt at {} ({}), running with empty stdin",
                    prompt_path.display(),
                    e
                );
                None
            }
        };

        let invocation = AgentInvocation {
            program: self.config.tool.clone(),
            args: self.config.tool_args.clone(),
            workdir: self.base.clone(),
            stdin,
        };

        match self.host.run(invocation).await {
            Ok(output) => {
                if let Some(code) = output.exit_code
                    && code != 0
                {
                    debug!("Iteration {}: agent exited with code {}", iteration, code);
                }
                IterationResult {
                    iteration,
                    completed: is_complete(&output.combined),
                    output: output.combined,
                    spawn_failed: false,
                }
            }
            Err(e) => {
                warn!(
                    "Iteration {}: failed to spawn '{}': {}",
                    iteration, self.config.tool, e
                );
                IterationResult {
                    iteration,
                    output: String::new(),
                    completed: false,
                    spawn_failed: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{ScriptedHost, ScriptedRun};
    use tempfile::TempDir;

    fn runner_with(host: ScriptedHost, dir: &TempDir) -> IterationRunner<ScriptedHost> {
        IterationRunner::new(Arc::new(host), RunConfig::default(), dir.path())
    }

    #[test]
    fn test_exact_marker_matches() {
        assert!(is_complete("<promise>COMPLETE</promise>"));
        assert!(is_complete("before <promise>COMPLETE</promise> after"));
        assert!(is_complete(
            "line one\nall stories pass <promise>COMPLETE</promise>\n"
        ));
    }

    #[test]
    fn test_near_marker_misses() {
        assert!(!is_complete(""));
        assert!(!is_complete("COMPLETE"));
        assert!(!is_complete("<promise>COMPLETE"));
        assert!(!is_complete("COMPLETE</promise>"));
        assert!(!is_complete("<promise>complete</promise>"));
        assert!(!is_complete("<promise> COMPLETE </promise>"));
        assert!(!is_complete("<Promise>COMPLETE</Promise>"));
    }

    #[tokio::test]
    async fn test_iteration_without_marker() {
        let dir = TempDir::new().unwrap();
        let runner = runner_with(ScriptedHost::always("Iteration 1: Normal output\n"), &dir);

        let result = runner.run(1).await;
        assert_eq!(result.iteration, 1);
        assert!(!result.completed);
        assert!(!result.spawn_failed);
        assert_eq!(result.output, "Iteration 1: Normal output\n");
    }

    #[tokio::test]
    async fn test_iteration_with_marker() {
        let dir = TempDir::new().unwrap();
        let runner = runner_with(
            ScriptedHost::always("done! <promise>COMPLETE</promise>\n"),
            &dir,
        );

        let result = runner.run(2).await;
        assert!(result.completed);
        assert_eq!(result.iteration, 2);
    }

    #[tokio::test]
    async fn test_marker_in_stderr_portion_counts() {
        // The host hands back one combined buffer; where the marker came
        // from does not matter.
        let dir = TempDir::new().unwrap();
        let runner = runner_with(
            ScriptedHost::new(vec![ScriptedRun::Exit(
                "err: <promise>COMPLETE</promise>".to_string(),
                1,
            )]),
            &dir,
        );

        let result = runner.run(1).await;
        assert!(result.completed);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_absorbed() {
        let dir = TempDir::new().unwrap();
        let runner = runner_with(ScriptedHost::new(vec![ScriptedRun::SpawnError]), &dir);

        let result = runner.run(1).await;
        assert!(!result.completed);
        assert!(result.spawn_failed);
        assert_eq!(result.output, "");
    }

    #[tokio::test]
    async fn test_prompt_file_streamed_to_stdin() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("prompt.md"), "do the work").unwrap();
        let host = Arc::new(ScriptedHost::always("ok"));
        let runner =
            IterationRunner::new(Arc::clone(&host), RunConfig::default(), dir.path());

        runner.run(1).await;

        let invocations = host.invocations();
        assert_eq!(invocations[0].stdin, Some(b"do the work".to_vec()));
        assert_eq!(invocations[0].program, "amp");
        assert_eq!(invocations[0].workdir, dir.path());
    }

    #[tokio::test]
    async fn test_missing_prompt_runs_with_empty_stdin() {
        let dir = TempDir::new().unwrap();
        let host = Arc::new(ScriptedHost::always("ok"));
        let runner =
            IterationRunner::new(Arc::clone(&host), RunConfig::default(), dir.path());

        let result = runner.run(1).await;
        assert!(!result.spawn_failed);
        assert_eq!(host.invocations()[0].stdin, None);
    }

    #[tokio::test]
    async fn test_tool_args_forwarded() {
        let dir = TempDir::new().unwrap();
        let host = Arc::new(ScriptedHost::always("ok"));
        let config = RunConfig {
            tool: "claude".to_string(),
            tool_args: vec!["-p".to_string(), "--permission-mode=plan".to_string()],
            ..RunConfig::for_tool("claude")
        };
        let runner = IterationRunner::new(Arc::clone(&host), config, dir.path());

        runner.run(1).await;

        let inv = &host.invocations()[0];
        assert_eq!(inv.program, "claude");
        assert_eq!(inv.args, vec!["-p", "--permission-mode=plan"]);
    }

    #[tokio::test]
    async fn test_absolute_prompt_path_used_as_given() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let abs = other.path().join("abs.md");
        std::fs::write(&abs, "absolute prompt").unwrap();

        let host = Arc::new(ScriptedHost::always("ok"));
        let config = RunConfig {
            prompt_file: abs.clone(),
            ..RunConfig::default()
        };
        let runner = IterationRunner::new(Arc::clone(&host), config, dir.path());
        assert_eq!(runner.prompt_path(), abs);

        runner.run(1).await;
        assert_eq!(host.invocations()[0].stdin, Some(b"absolute prompt".to_vec()));
    }
}
