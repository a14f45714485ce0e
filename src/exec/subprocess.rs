//! Subprocess execution with environment overrides

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::Result;
use console::style;

use crate::error::TaskError;

/// Environment overrides applied on top of the inherited environment
pub type EnvMap = BTreeMap<String, String>;

/// Result of a subprocess execution
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code (-1 when terminated by a signal)
    pub exit_code: i32,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,

    /// Execution duration
    pub duration: Duration,
}

impl CommandResult {
    /// Create a CommandResult from an exit status
    pub fn from_status(status: ExitStatus, stdout: String, stderr: String, duration: Duration) -> Self {
        let exit_code = status.code().unwrap_or(-1);
        Self {
            success: status.success(),
            exit_code,
            stdout,
            stderr,
            duration,
        }
    }

    /// stdout followed by stderr
    pub fn combined_output(&self) -> String {
        let mut output = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(&self.stderr);
        }
        output
    }
}

/// Render the `Running '...' with env ...` line shown before each subprocess
pub fn describe_command(program: &str, args: &[String], env: &EnvMap) -> String {
    let rendered = command_line(program, args);
    if env.is_empty() {
        return format!("Running '{}'", rendered);
    }

    let env_line = env
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", key, value))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Running '{}' with env {}", rendered, env_line)
}

/// Join program and args for error messages
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a command in `cwd` with environment overrides
///
/// With `inherit_io` the child writes straight to the terminal and the
/// captured output fields stay empty.
pub fn run_command(
    program: &str,
    args: &[String],
    env: &EnvMap,
    cwd: &Path,
    inherit_io: bool,
) -> Result<CommandResult> {
    println!("{}", style(describe_command(program, args, env)).dim());

    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args).envs(env).current_dir(cwd);

    tracing::debug!(program, ?args, cwd = %cwd.display(), "spawning");

    let result = if inherit_io {
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        let status = cmd.status().map_err(|source| TaskError::Spawn {
            program: program.to_string(),
            source,
        })?;

        CommandResult::from_status(status, String::new(), String::new(), start.elapsed())
    } else {
        let output = cmd.output().map_err(|source| TaskError::Spawn {
            program: program.to_string(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        CommandResult::from_status(output.status, stdout, stderr, start.elapsed())
    };

    tracing::debug!(
        program,
        exit_code = result.exit_code,
        elapsed_ms = result.duration.as_millis() as u64,
        "exited"
    );

    Ok(result)
}

/// Run a command and capture its output, failing on a non-zero exit
pub fn run_checked(program: &str, args: &[String], env: &EnvMap, cwd: &Path) -> Result<CommandResult> {
    let result = run_command(program, args, env, cwd, false)?;
    if !result.success {
        return Err(TaskError::CommandFailed {
            command: command_line(program, args),
            exit_code: result.exit_code,
            output: result.combined_output(),
        }
        .into());
    }
    Ok(result)
}
