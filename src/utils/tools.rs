//! Tool detection with helpful errors when something is missing

use std::path::{Path, PathBuf};

use anyhow::Result;
use which::which;

use crate::error::{hints, TaskError};

/// Tool detection result
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Resolved path to the executable
    pub path: PathBuf,
}

/// Check if a tool exists and return its information
pub fn check_tool(tool_name: &str) -> Option<ToolInfo> {
    which(tool_name).ok().map(|path| ToolInfo { path })
}

/// Require a tool to exist, return error with hint if missing
pub fn require_tool(tool_name: &str, required_for: &str) -> Result<ToolInfo> {
    match check_tool(tool_name) {
        Some(info) => {
            tracing::debug!(tool = tool_name, path = %info.path.display(), "resolved tool");
            Ok(info)
        }
        None => Err(TaskError::missing_tool(tool_name, required_for, get_tool_hint(tool_name)).into()),
    }
}

/// Get installation hint for a tool
///
/// Matches on the file stem so that `/usr/local/go/bin/go` and `go1.22`
/// still get the Go hint.
fn get_tool_hint(tool_name: &str) -> &'static str {
    let stem = Path::new(tool_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(tool_name);

    if stem.starts_with("git") {
        hints::git()
    } else if stem.starts_with("go") {
        hints::go()
    } else {
        "Install this tool and ensure it's in your PATH"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_check_common_tool() {
        let info = check_tool("sh").expect("sh should be on PATH");
        assert!(info.path.is_absolute());
        assert_eq!(info.path.file_name().and_then(|n| n.to_str()), Some("sh"));
    }

    #[test]
    fn test_require_missing_tool() {
        let err = require_tool("gotasks-missing-go", "check").unwrap_err();
        match err.downcast_ref::<TaskError>() {
            Some(TaskError::MissingTool { tool, required_for, hint }) => {
                assert_eq!(tool, "gotasks-missing-go");
                assert_eq!(required_for, "check");
                assert!(!hint.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_tool_hints() {
        assert_eq!(get_tool_hint("go"), hints::go());
        assert_eq!(get_tool_hint("/usr/local/go/bin/go1.22"), hints::go());
        assert_eq!(get_tool_hint("git"), hints::git());
        assert!(get_tool_hint("make").contains("PATH"));
    }
}
