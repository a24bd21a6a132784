//! Runner module - one-iteration execution and the loop state machine.
//!
//! [`IterationRunner`] owns a single spawn-feed-collect-classify cycle;
//! [`LoopController`] drives it sequentially up to the iteration cap with
//! first-completion-wins semantics.

mod controller;
mod iteration;

pub use controller::{LoopController, LoopResult};
pub use iteration::{COMPLETION_MARKER, IterationResult, IterationRunner, is_complete};
