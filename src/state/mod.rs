//! State module - persisted loop state on the filesystem.
//!
//! Owns the branch marker (`.last-branch`), the progress log
//! (`progress.txt`) and the archive folder (`archive/`). The task list
//! (`prd.json`) is read-only input written by external PRD tooling.

mod store;
mod task_list;

pub use store::{ArchiveOutcome, StateStore};
pub use task_list::{TaskList, UserStory};
