//! Loop controller - drives iterations up to the cap.
//!
//! One archive check runs before the first iteration, then iterations
//! execute strictly sequentially. The loop stops at the first completed
//! iteration; a failed spawn just consumes its iteration slot.

use std::sync::Arc;

use chrono::Local;
use log::info;

use crate::config::RunConfig;
use crate::error::Result;
use crate::process::ProcessHost;
use crate::state::StateStore;

use super::iteration::IterationRunner;

/// Final outcome of a loop run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopResult {
    /// True when some iteration emitted the completion marker.
    pub completed: bool,
    /// Iterations actually executed: the completing iteration's index, or
    /// the cap when exhausted.
    pub iterations_run: u32,
    /// How many of those iterations failed to spawn the agent at all.
    pub spawn_failures: u32,
}

/// Drives [`IterationRunner`] until completion or exhaustion.
pub struct LoopController<H: ProcessHost> {
    store: StateStore,
    runner: IterationRunner<H>,
    max_iterations: u32,
}

impl<H: ProcessHost> LoopController<H> {
    /// Build a controller for one working directory.
    pub fn new(store: StateStore, host: Arc<H>, config: RunConfig) -> Self {
        let max_iterations = config.max_iterations;
        let runner = IterationRunner::new(host, config, store.base());
        Self {
            store,
            runner,
            max_iterations,
        }
    }

    /// Run the loop to completion or exhaustion.
    ///
    /// Per-iteration problems (spawn failures, non-zero exits, missing
    /// prompt) never surface here; only structural state errors do.
    pub async fn run(&self) -> Result<LoopResult> {
        self.store.archive_if_branch_changed(Local::now())?;

        let mut spawn_failures = 0;

        for iteration in 1..=self.max_iterations {
            info!("Starting iteration {}/{}", iteration, self.max_iterations);

            let result = self.runner.run(iteration).await;
            if result.spawn_failed {
                spawn_failures += 1;
            }

            if result.completed {
                info!("Completion marker found on iteration {}", iteration);
                return Ok(LoopResult {
                    completed: true,
                    iterations_run: iteration,
                    spawn_failures,
                });
            }
        }

        info!(
            "No completion after {} iteration(s), giving up",
            self.max_iterations
        );
        Ok(LoopResult {
            completed: false,
            iterations_run: self.max_iterations,
            spawn_failures,
        })
    }
}
