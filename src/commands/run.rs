//! Run command implementation
//!
//! Builds the program for this computer and runs it.

use anyhow::Result;
use clap::Args;

use crate::build::{build_target, BuildContext, BuildProfile, Platform};
use crate::error::TaskError;
use crate::exec::{command_line, run_command, EnvMap};
use crate::utils::tools::require_tool;

/// Build and run the program
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Arguments to pass to the executable
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl RunCommand {
    /// Execute the run command with the given profile
    pub fn execute(self, ctx: &BuildContext, profile: BuildProfile) -> Result<()> {
        run_program(ctx, profile, &self.args)
    }
}

/// Build for the host, then execute the result with inherited stdio
pub fn run_program(ctx: &BuildContext, profile: BuildProfile, args: &[String]) -> Result<()> {
    require_tool(ctx.go(), "run")?;

    let executable = build_target(ctx, &Platform::host(), profile)?;
    let program = executable.display().to_string();

    if ctx.verbose {
        eprintln!("Running {} build: {}", profile, program);
    }

    let result = run_command(&program, args, &EnvMap::new(), &ctx.project_root, true)?;
    if !result.success {
        return Err(TaskError::CommandFailed {
            command: command_line(&program, args),
            exit_code: result.exit_code,
            output: String::new(),
        }
        .into());
    }
    Ok(())
}

/// `run` without arguments
pub fn run_debug(ctx: &BuildContext) -> Result<()> {
    run_program(ctx, BuildProfile::Debug, &[])
}

/// `run-release` without arguments
pub fn run_release(ctx: &BuildContext) -> Result<()> {
    run_program(ctx, BuildProfile::Release, &[])
}
