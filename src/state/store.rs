//! State store - branch marker, progress log and archive folder.
//!
//! All paths are relative to one base directory. The store performs plain
//! file I/O and has no process concerns; archival is idempotent when the
//! tracked branch has not changed.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{info, warn};

use crate::error::{Result, WiggumError};

use super::task_list::TaskList;

/// Task list filename inside the base directory.
pub const TASK_LIST_FILE: &str = "prd.json";

/// Progress log filename inside the base directory.
pub const PROGRESS_FILE: &str = "progress.txt";

/// Branch marker filename inside the base directory.
pub const MARKER_FILE: &str = ".last-branch";

/// Archive directory name inside the base directory.
pub const ARCHIVE_DIR: &str = "archive";

/// Branch prefix stripped when naming archive folders.
const BRANCH_PREFIX: &str = "ralph/";

/// Result of an archive check that actually archived something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutcome {
    /// The branch recorded before the change.
    pub previous_branch: String,
    /// The branch now recorded in the marker.
    pub new_branch: String,
    /// Directory the snapshot was written to.
    pub archive_dir: PathBuf,
}

/// Filesystem-backed state for one working directory.
#[derive(Debug)]
pub struct StateStore {
    base: PathBuf,
}

impl StateStore {
    /// Create a store rooted at the given base directory.
    ///
    /// Fails if the directory does not exist; everything underneath it is
    /// created lazily.
    pub fn new(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref().to_path_buf();
        if !base.is_dir() {
            return Err(WiggumError::InvalidBaseDir(base));
        }
        Ok(Self { base })
    }

    /// The base directory this store is rooted at.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn task_list_path(&self) -> PathBuf {
        self.base.join(TASK_LIST_FILE)
    }

    fn progress_path(&self) -> PathBuf {
        self.base.join(PROGRESS_FILE)
    }

    fn marker_path(&self) -> PathBuf {
        self.base.join(MARKER_FILE)
    }

    /// Read the `branchName` currently declared by the task list.
    pub fn tracked_branch(&self) -> Result<String> {
        let list = TaskList::load(self.task_list_path())?;
        Ok(list.branch_name)
    }

    /// Read the last archived branch from the marker file, if any.
    pub fn last_branch(&self) -> Result<Option<String>> {
        let path = self.marker_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(content.trim().to_string()))
    }

    /// Snapshot state if the task list's branch differs from the marker.
    ///
    /// Policy per case:
    /// - no task list: silent no-op
    /// - malformed task list: warn and skip archival for this run
    /// - no marker yet: record the branch, no archive
    /// - branch unchanged: no writes at all
    /// - branch changed: copy task list + progress log into
    ///   `archive/{date}-{branch}`, reset the progress log to a fresh
    ///   header, overwrite the marker
    pub fn archive_if_branch_changed(&self, now: DateTime<Local>) -> Result<Option<ArchiveOutcome>> {
        let branch = match self.tracked_branch() {
            Ok(branch) => branch,
            Err(WiggumError::MissingTaskList(_)) => return Ok(None),
            Err(WiggumError::MalformedTaskList { path, reason }) => {
                warn!(
                    "Skipping archive check: malformed task list at {}: {}",
                    path.display(),
                    reason
                );
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let Some(last) = self.last_branch()? else {
            // First run in this directory: start tracking, nothing to archive.
            fs::write(self.marker_path(), &branch)?;
            info!("Tracking branch: {}", branch);
            return Ok(None);
        };

        if last == branch {
            return Ok(None);
        }

        let archive_dir = self.archive_dir_for(&branch, now);
        fs::create_dir_all(&archive_dir)?;

        for name in [TASK_LIST_FILE, PROGRESS_FILE] {
            let source = self.base.join(name);
            if source.exists() {
                fs::copy(&source, archive_dir.join(name))?;
            }
        }

        fs::write(self.progress_path(), progress_header(now))?;
        fs::write(self.marker_path(), &branch)?;

        info!(
            "Branch changed {} -> {}, archived to {}",
            last,
            branch,
            archive_dir.display()
        );

        Ok(Some(ArchiveOutcome {
            previous_branch: last,
            new_branch: branch,
            archive_dir,
        }))
    }

    /// Archive folder for a branch: `archive/{YYYY-MM-DD}-{branch}` with the
    /// conventional "ralph/" prefix stripped.
    fn archive_dir_for(&self, branch: &str, now: DateTime<Local>) -> PathBuf {
        let short = branch.strip_prefix(BRANCH_PREFIX).unwrap_or(branch);
        self.base
            .join(ARCHIVE_DIR)
            .join(format!("{}-{}", now.format("%Y-%m-%d"), short))
    }
}

/// Fresh progress log content after a reset.
fn progress_header(now: DateTime<Local>) -> String {
    format!(
        "# Ralph Progress Log\nStarted: {}\n\n",
        now.format("%Y-%m-%d %H:%M:%S")
    )
}
