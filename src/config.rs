//! Run configuration - the typed result of CLI argument resolution.
//!
//! A `RunConfig` is immutable once built and is passed by value through the
//! loop; there is no module-level state.

use std::path::PathBuf;

/// Default agent binary when `--tool` is not given.
pub const DEFAULT_TOOL: &str = "amp";

/// Default iteration cap when no count is given.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// Configuration for one loop run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Agent binary to spawn each iteration (e.g. "amp", "claude", "cursor").
    /// Not validated against an allowlist; any string is executed as-is.
    pub tool: String,

    /// Maximum number of iterations before giving up.
    pub max_iterations: u32,

    /// Prompt file streamed into the agent's stdin. Absolute, or relative to
    /// the base directory.
    pub prompt_file: PathBuf,

    /// Extra arguments forwarded verbatim to the agent binary.
    pub tool_args: Vec<String>,
}

impl RunConfig {
    /// Build a config for the given tool with all defaults applied.
    pub fn for_tool(tool: impl Into<String>) -> Self {
        let tool = tool.into();
        let prompt_file = default_prompt_file(&tool);
        Self {
            tool,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            prompt_file,
            tool_args: Vec::new(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::for_tool(DEFAULT_TOOL)
    }
}

/// Default prompt filename for a tool: claude reads its own convention file,
/// everything else gets `prompt.md`.
pub fn default_prompt_file(tool: &str) -> PathBuf {
    if tool == "claude" {
        PathBuf::from("CLAUDE.md")
    } else {
        PathBuf::from("prompt.md")
    }
}
