//! gotasks - a task runner for Go programs
//!
//! ## Architecture
//!
//! ```text
//! CLI → commands/ → build/ (single target, fan-out) → exec/ → go, git
//! ```

mod build;
mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod testing;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::TaskError;

fn init_logging(verbose: bool) {
    let default = if verbose { "gotasks=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("GOTASKS_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<TaskError>() {
                Some(task_error) => {
                    let outer = err.to_string();
                    if outer != task_error.to_string() {
                        eprintln!("{}", style(outer).red().bold());
                    }
                    task_error.display_with_hints();
                }
                None => eprintln!("{} {:#}", style("ERROR:").red().bold(), err),
            }
            ExitCode::FAILURE
        }
    }
}
