//! Process module - the subprocess abstraction the loop runs agents through.
//!
//! [`ProcessHost`] is the seam between the loop and the operating system:
//! one production implementation spawns real agent binaries with tokio, and
//! [`ScriptedHost`] substitutes canned runs for tests and for the
//! `RALPH_TEST_MODE` hook.

mod host;
mod scripted;

pub use host::{AgentInvocation, AgentOutput, ProcessHost, TokioProcessHost};
pub use scripted::{ScriptedHost, ScriptedRun};
