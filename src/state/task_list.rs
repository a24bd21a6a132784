//! Task list (`prd.json`) schema.
//!
//! Written by external PRD tooling; the loop only consults `branchName` to
//! detect feature switches, but the full shape is typed so parse failures
//! point at the offending field.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WiggumError};

/// The externally-maintained task list, one per working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub project: String,

    /// Identifies the current feature/work item, conventionally prefixed
    /// with "ralph/".
    pub branch_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub user_stories: Vec<UserStory>,
}

/// One work item inside the task list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub passes: bool,
    #[serde(default)]
    pub notes: String,
}

impl TaskList {
    /// Load and parse a task list from disk.
    ///
    /// Distinguishes a missing file ([`WiggumError::MissingTaskList`]) from
    /// an unparseable one ([`WiggumError::MalformedTaskList`]) so the caller
    /// can apply different policies to each.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(WiggumError::MissingTaskList(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| WiggumError::MalformedTaskList {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Count of stories whose acceptance criteria have been met.
    pub fn stories_passing(&self) -> usize {
        self.user_stories.iter().filter(|s| s.passes).count()
    }
}
