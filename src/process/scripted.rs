//! Scripted process host - canned agent runs for tests and test mode.
//!
//! Plays back a fixed sequence of outcomes, one per `run` call, and records
//! every invocation so tests can assert on what would have been spawned.
//! Once the script is exhausted the last outcome repeats.

use std::sync::Mutex;

use async_trait::async_trait;

use super::host::{AgentInvocation, AgentOutput, ProcessHost};

/// One scripted outcome for a `run` call.
#[derive(Debug, Clone)]
pub enum ScriptedRun {
    /// Process "ran" and produced this combined output with exit code 0.
    Output(String),
    /// Process "ran" and produced this output with the given exit code.
    Exit(String, i32),
    /// Spawn failed (binary not found).
    SpawnError,
}

/// Process host that replays a script instead of spawning anything.
pub struct ScriptedHost {
    script: Vec<ScriptedRun>,
    calls: Mutex<usize>,
    invocations: Mutex<Vec<AgentInvocation>>,
}

impl ScriptedHost {
    /// Create a host that plays back the given outcomes in order.
    pub fn new(script: Vec<ScriptedRun>) -> Self {
        Self {
            script,
            calls: Mutex::new(0),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Host whose every run emits the given output.
    pub fn always(output: impl Into<String>) -> Self {
        Self::new(vec![ScriptedRun::Output(output.into())])
    }

    /// Number of runs performed so far.
    pub fn runs(&self) -> usize {
        *self.calls.lock().expect("calls lock poisoned")
    }

    /// Invocations recorded so far, in order.
    pub fn invocations(&self) -> Vec<AgentInvocation> {
        self.invocations
            .lock()
            .expect("invocations lock poisoned")
            .clone()
    }
}

#[async_trait]
impl ProcessHost for ScriptedHost {
    async fn run(&self, invocation: AgentInvocation) -> std::io::Result<AgentOutput> {
        self.invocations
            .lock()
            .expect("invocations lock poisoned")
            .push(invocation);

        let mut calls = self.calls.lock().expect("calls lock poisoned");
        let index = (*calls).min(self.script.len().saturating_sub(1));
        *calls += 1;

        match self.script.get(index) {
            Some(ScriptedRun::Output(text)) => Ok(AgentOutput {
                combined: text.clone(),
                exit_code: Some(0),
            }),
            Some(ScriptedRun::Exit(text, code)) => Ok(AgentOutput {
                combined: text.clone(),
                exit_code: Some(*code),
            }),
            Some(ScriptedRun::SpawnError) => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "scripted spawn failure",
            )),
            None => Ok(AgentOutput {
                combined: String::new(),
                exit_code: Some(0),
            }),
        }
    }
}
