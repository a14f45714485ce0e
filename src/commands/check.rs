//! Check and check-repo-clean command implementations
//!
//! Both run tools that are expected to print nothing; any output is a
//! failure.

use anyhow::Result;

use crate::build::BuildContext;
use crate::error::TaskError;
use crate::exec::{command_line, run_checked, EnvMap};
use crate::utils::tools::require_tool;

/// Run `go vet ./...` and `go fmt ./...` and require both to stay silent
pub fn check(ctx: &BuildContext) -> Result<()> {
    require_tool(ctx.go(), "check")?;

    expect_silent(ctx, ctx.go(), &["vet", "./..."])?;
    expect_silent(ctx, ctx.go(), &["fmt", "./..."])?;
    Ok(())
}

/// Require `git status --porcelain` to report no changes
pub fn check_repo_clean(ctx: &BuildContext) -> Result<()> {
    require_tool(ctx.git(), "check-repo-clean")?;

    expect_silent(ctx, ctx.git(), &["status", "--porcelain"])
}

fn expect_silent(ctx: &BuildContext, program: &str, args: &[&str]) -> Result<()> {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let result = run_checked(program, &args, &EnvMap::new(), &ctx.project_root)?;

    let output = result.combined_output();
    if !output.trim().is_empty() {
        // Named by program and subcommand, e.g. "go vet"
        let tool = command_line(program, &args[..1]);
        return Err(TaskError::validation(tool, output.trim_end()).into());
    }
    Ok(())
}
