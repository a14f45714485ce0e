//! Clean command implementation

use std::fs;
use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::build::BuildContext;
use crate::error::TaskError;
use crate::utils::paths::{dir_size, format_size};
use crate::utils::terminal::{print_info, print_success};

/// Remove the bin directory and everything built into it
#[derive(Args, Debug, Default)]
pub struct CleanCommand {
    /// Show what would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

impl CleanCommand {
    /// Execute the clean command
    pub fn execute(self, ctx: &BuildContext) -> Result<()> {
        let bin_dir = ctx.project_root.join(ctx.bin_dir());
        remove_bin_dir(&bin_dir, self.dry_run)
    }
}

/// Remove `bin_dir` recursively; a directory that does not exist is already clean
pub fn remove_bin_dir(bin_dir: &Path, dry_run: bool) -> Result<()> {
    eprintln!("Removing {}", bin_dir.display());

    if !bin_dir.exists() {
        print_info(&format!("{} does not exist, nothing to clean", bin_dir.display()));
        return Ok(());
    }

    let size = format_size(dir_size(bin_dir));
    if dry_run {
        eprintln!("[DRY RUN] Would remove {} ({})", bin_dir.display(), size);
        return Ok(());
    }

    tracing::debug!(path = %bin_dir.display(), "removing bin directory");
    fs::remove_dir_all(bin_dir).map_err(|source| TaskError::Filesystem {
        path: bin_dir.to_path_buf(),
        source,
    })?;

    print_success(&format!("removed {} ({})", bin_dir.display(), size));
    Ok(())
}
