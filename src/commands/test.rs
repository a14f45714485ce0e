//! Test command implementation

use anyhow::Result;
use clap::Args;

use crate::build::BuildContext;
use crate::error::TaskError;
use crate::exec::{command_line, run_command, EnvMap};
use crate::testing::print_colorized;
use crate::utils::terminal::print_info;
use crate::utils::tools::require_tool;

/// Run `go test -v ./...` with colorized output
#[derive(Args, Debug, Default)]
pub struct TestCommand {
    /// Only run tests matching this regular expression (go test -run)
    #[arg(long)]
    pub run: Option<String>,

    /// Enable the race detector
    #[arg(long)]
    pub race: bool,
}

impl TestCommand {
    /// Execute the test command
    pub fn execute(self, ctx: &BuildContext) -> Result<()> {
        run_tests(ctx, &self)
    }

    fn go_test_args(&self) -> Vec<String> {
        let mut args = vec!["test".to_string(), "-v".to_string()];
        if self.race {
            args.push("-race".to_string());
        }
        if let Some(pattern) = &self.run {
            args.push("-run".to_string());
            args.push(pattern.clone());
        }
        args.push("./...".to_string());
        args
    }
}

/// Run the test suite, printing each line colored by outcome
pub fn run_tests(ctx: &BuildContext, options: &TestCommand) -> Result<()> {
    require_tool(ctx.go(), "test")?;

    let args = options.go_test_args();
    let result = run_command(ctx.go(), &args, &EnvMap::new(), &ctx.project_root, false)?;

    let summary = print_colorized(&result.combined_output());
    if ctx.verbose {
        print_info(&summary.describe());
    }

    if !result.success {
        return Err(TaskError::CommandFailed {
            command: command_line(ctx.go(), &args),
            exit_code: result.exit_code,
            output: String::new(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        assert_eq!(TestCommand::default().go_test_args(), vec!["test", "-v", "./..."]);
    }

    #[test]
    fn test_filtered_race_args() {
        let cmd = TestCommand {
            run: Some("TestSplit/.*".to_string()),
            race: true,
        };
        assert_eq!(
            cmd.go_test_args(),
            vec!["test", "-v", "-race", "-run", "TestSplit/.*", "./..."]
        );
    }
}
