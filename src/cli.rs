//! CLI argument parsing using clap derive macros

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::build::{BuildContext, BuildProfile};
use crate::commands::{
    build::{build_all, build_debug, BuildCommand},
    check::{check, check_repo_clean},
    ci::CiCommand,
    clean::CleanCommand,
    run::RunCommand,
    targets::list_targets,
    test::TestCommand,
};

/// gotasks - build, test and check a Go program
///
/// Wraps the go and git toolchains and builds every target platform
/// concurrently.
#[derive(Parser, Debug)]
#[command(name = "gotasks")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Gotasks.toml (defaults to searching upward from the working directory)
    #[arg(long, global = true, env = "GOTASKS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a release executable for one platform (defaults to this computer)
    Build(BuildCommand),

    /// Build a debug executable for this computer
    Debug,

    /// Build release executables for every target plus a debug build, concurrently
    BuildAll,

    /// Build and run the debug executable
    Run(RunCommand),

    /// Build and run the release executable
    RunRelease(RunCommand),

    /// Run go vet and go fmt, failing on any output
    Check,

    /// Fail if git reports uncommitted changes
    CheckRepoClean,

    /// Run go test with colorized output
    Test(TestCommand),

    /// Run every CI step in order
    Ci(CiCommand),

    /// Remove the bin directory
    Clean(CleanCommand),

    /// List target platforms and their executable paths
    Targets,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        let ctx = BuildContext::load(self.config.as_deref(), self.verbose)?;
        tracing::debug!(root = %ctx.project_root.display(), "loaded project");

        match self.command {
            Commands::Build(cmd) => cmd.execute(&ctx),
            Commands::Debug => build_debug(&ctx),
            Commands::BuildAll => build_all(&ctx),
            Commands::Run(cmd) => cmd.execute(&ctx, BuildProfile::Debug),
            Commands::RunRelease(cmd) => cmd.execute(&ctx, BuildProfile::Release),
            Commands::Check => check(&ctx),
            Commands::CheckRepoClean => check_repo_clean(&ctx),
            Commands::Test(cmd) => cmd.execute(&ctx),
            Commands::Ci(cmd) => cmd.execute(&ctx),
            Commands::Clean(cmd) => cmd.execute(&ctx),
            Commands::Targets => list_targets(&ctx),
        }
    }
}
