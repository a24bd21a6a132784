//! Error types for Wiggum
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// All error types that can occur in Wiggum
#[derive(Debug, Error)]
pub enum WiggumError {
    /// Task list file exists but cannot be parsed or lacks `branchName`
    #[error("Malformed task list at {path}: {reason}")]
    MalformedTaskList { path: PathBuf, reason: String },

    /// Task list file does not exist
    #[error("Task list not found: {0}")]
    MissingTaskList(PathBuf),

    /// Base working directory is missing or not a directory
    #[error("Invalid base directory: {0}")]
    InvalidBaseDir(PathBuf),

    /// State file (marker, progress log, archive) could not be written
    #[error("State error: {0}")]
    State(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Wiggum operations
pub type Result<T> = std::result::Result<T, WiggumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_task_list_error() {
        let err = WiggumError::MalformedTaskList {
            path: PathBuf::from("prd.json"),
            reason: "missing field `branchName`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed task list at prd.json: missing field `branchName`"
        );
    }

    #[test]
    fn test_missing_task_list_error() {
        let err = WiggumError::MissingTaskList(PathBuf::from("/work/prd.json"));
        assert_eq!(err.to_string(), "Task list not found: /work/prd.json");
    }

    #[test]
    fn test_invalid_base_dir_error() {
        let err = WiggumError::InvalidBaseDir(PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "Invalid base directory: /nope");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WiggumError = io_err.into();
        assert!(matches!(err, WiggumError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: WiggumError = json_err.into();
        assert!(matches!(err, WiggumError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        assert!(returns_ok().is_ok());
    }
}
