//! Path utilities for gotasks

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::config::CONFIG_FILE;
use crate::error::TaskError;

/// Marker files that identify a project root, in priority order
const ROOT_MARKERS: &[&str] = &[CONFIG_FILE, "go.mod"];

/// Find the project root by looking for Gotasks.toml, then go.mod
///
/// Falls back to `start` itself when neither is found in it or any parent.
pub fn find_project_root_from(start: &Path) -> PathBuf {
    for marker in ROOT_MARKERS {
        let mut dir = Some(start);
        while let Some(current) = dir {
            if current.join(marker).is_file() {
                return current.to_path_buf();
            }
            dir = current.parent();
        }
    }
    start.to_path_buf()
}

/// Find the project root from the current directory
pub fn find_project_root() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    Ok(find_project_root_from(&current_dir))
}

/// Ensure a directory exists
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|source| TaskError::Filesystem {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Total size in bytes of the files under `path`
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|e| e.metadata().ok())
        .filter(|m| m.is_file())
        .map(|m| m.len())
        .sum()
}

/// Human readable byte count, e.g. `1.50 MB`
pub fn format_size(size_bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = size_bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_idx])
}
