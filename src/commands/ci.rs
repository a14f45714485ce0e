//! CI command implementation
//!
//! Runs every step a CI system would want, in order, stopping at the first
//! failure.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use super::build::build_all;
use super::check::{check, check_repo_clean};
use super::run::{run_debug, run_release};
use super::test::{run_tests, TestCommand};
use crate::build::BuildContext;
use crate::utils::terminal::{format_duration, print_heading, print_success};

type Step = fn(&BuildContext) -> Result<()>;

/// Run check, check-repo-clean, test, build-all, run and run-release
#[derive(Args, Debug)]
pub struct CiCommand {
    /// Skip the check-repo-clean step
    #[arg(long)]
    pub allow_dirty: bool,

    /// Skip running the debug and release executables
    #[arg(long)]
    pub skip_run: bool,
}

fn test_step(ctx: &BuildContext) -> Result<()> {
    run_tests(ctx, &TestCommand::default())
}

impl CiCommand {
    /// Steps selected by the flags, in execution order
    fn steps(&self) -> Vec<(&'static str, Step)> {
        let mut steps: Vec<(&'static str, Step)> = vec![("check", check)];
        if !self.allow_dirty {
            steps.push(("check-repo-clean", check_repo_clean));
        }
        steps.push(("test", test_step));
        steps.push(("build-all", build_all));
        if !self.skip_run {
            steps.push(("run", run_debug));
            steps.push(("run-release", run_release));
        }
        steps
    }

    /// Execute the ci command
    pub fn execute(self, ctx: &BuildContext) -> Result<()> {
        let start = Instant::now();
        let steps = self.steps();
        let total = steps.len();

        for (index, (name, step)) in steps.into_iter().enumerate() {
            print_heading(&format!("[{}/{}] {}", index + 1, total, name));
            tracing::debug!(step = name, "ci step started");
            step(ctx).with_context(|| format!("ci step '{}' failed", name))?;
        }

        print_success(&format!(
            "all {} ci steps passed in {}",
            total,
            format_duration(start.elapsed())
        ));
        Ok(())
    }
}
