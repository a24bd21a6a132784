//! Wiggum - an iteration loop runner for AI coding-agent CLIs
//!
//! Wiggum implements the "Ralph Wiggum" pattern against external agent
//! binaries (amp, claude, cursor): spawn the agent once per iteration with a
//! prompt on stdin, tee and buffer its output, and stop as soon as the output
//! contains the completion marker or the iteration cap is reached. Branch
//! changes in the task list (`prd.json`) snapshot the progress log into an
//! archive before the loop starts.

pub mod cli;
pub mod config;
pub mod error;
pub mod process;
pub mod runner;
pub mod state;

pub use error::{Result, WiggumError};
