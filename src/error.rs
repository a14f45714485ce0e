//! Error types and helpers for user-friendly error messages
//!
//! Every task wrapper returns one of these so that `main` can print the
//! failure together with an actionable hint.

use std::path::PathBuf;

use thiserror::Error;

/// One failed unit of a parallel build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// Task label, e.g. `linux-amd64`
    pub label: String,
    /// Rendered error message
    pub message: String,
}

/// Custom error types with helpful context and suggestions
#[derive(Error, Debug)]
pub enum TaskError {
    /// The process could not be started at all
    #[error("Failed to execute {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited with a non-zero status
    #[error("'{command}' failed with exit code {exit_code}{}", render_output(.output))]
    CommandFailed {
        command: String,
        exit_code: i32,
        output: String,
    },

    /// A tool that should stay silent printed something
    #[error("{tool} says something:\n{output}")]
    Validation { tool: String, output: String },

    /// Filesystem operation failure
    #[error("Filesystem error at {}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        hint: Option<String>,
    },

    /// Tool/executable not found on PATH
    #[error("Missing tool: {tool} (required for {required_for})")]
    MissingTool {
        tool: String,
        required_for: String,
        hint: String,
    },

    /// Aggregated failures from a parallel build
    #[error("{} build task(s) failed: {}", .failures.len(), failed_labels(.failures))]
    BuildFailures { failures: Vec<TaskFailure> },

    /// Requested build target is not configured
    #[error("Unknown target '{target}'")]
    UnknownTarget {
        target: String,
        available: Vec<String>,
    },
}

fn render_output(output: &str) -> String {
    let trimmed = output.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{}", trimmed)
    }
}

fn failed_labels(failures: &[TaskFailure]) -> String {
    failures
        .iter()
        .map(|f| f.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TaskError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            hint: None,
        }
    }

    /// Create a configuration error with a hint
    pub fn config_error_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create a missing tool error
    pub fn missing_tool(
        tool: impl Into<String>,
        required_for: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            required_for: required_for.into(),
            hint: hint.into(),
        }
    }

    /// Create a validation failure for a tool that produced output
    pub fn validation(tool: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Validation {
            tool: tool.into(),
            output: output.into(),
        }
    }

    fn hint(&self) -> Option<&str> {
        match self {
            TaskError::Config { hint, .. } => hint.as_deref(),
            TaskError::MissingTool { hint, .. } => Some(hint),
            TaskError::Validation { tool, .. } if tool.ends_with(" fmt") => {
                Some("Files were reformatted in place. Review and commit the changes.")
            }
            TaskError::Validation { tool, .. } if tool.ends_with(" status") => {
                Some(hints::dirty_repo())
            }
            _ => None,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        if let Some(h) = self.hint() {
            eprintln!("\n{} {}", style("HINT:").yellow().bold(), h);
        }

        if let TaskError::BuildFailures { failures } = self {
            eprintln!("\n{}", style("FAILED TASKS:").cyan().bold());
            for failure in failures {
                let first_line = failure.message.lines().next().unwrap_or_default();
                eprintln!("  • {}: {}", failure.label, first_line);
            }
        }

        if let TaskError::UnknownTarget { available, .. } = self {
            if !available.is_empty() {
                eprintln!("\n{}", style("AVAILABLE:").cyan().bold());
                for target in available {
                    eprintln!("  • {}", target);
                }
            }
        }

        eprintln!();
    }
}

/// Common error hints
pub mod hints {
    /// Get hint for missing Go toolchain
    pub fn go() -> &'static str {
        "Install Go from https://go.dev/dl/ or use your package manager:\n\
         • macOS: brew install go\n\
         • Ubuntu: sudo apt install golang-go\n\
         • Windows: winget install GoLang.Go\n\
         \n\
         Or point [toolchain] go in Gotasks.toml at your go binary."
    }

    /// Get hint for missing Git
    pub fn git() -> &'static str {
        "Install Git from https://git-scm.com/ or use your package manager:\n\
         • macOS: brew install git\n\
         • Ubuntu: sudo apt install git\n\
         • Windows: winget install Git.Git"
    }

    /// Get hint for a dirty working tree
    pub fn dirty_repo() -> &'static str {
        "Commit or stash the listed changes, or run: gotasks ci --allow-dirty"
    }

    /// Get hint for invalid Gotasks.toml
    pub fn invalid_config() -> &'static str {
        "Gotasks.toml is invalid. Common issues:\n\
         • Invalid TOML syntax (check quotes, brackets, commas)\n\
         • Duplicate [[targets]] entries\n\
         • Empty os/arch values or an executable name containing '/'"
    }
}
