//! Configuration validation with helpful error messages

use std::collections::HashSet;

use anyhow::Result;

use super::GotasksConfig;
use crate::error::{hints, TaskError};

/// Validate the entire Gotasks configuration
///
/// An empty executable name is accepted here; it is filled in from the
/// project directory before the config is used.
pub fn validate_config(config: &GotasksConfig) -> Result<()> {
    validate_executable_name(&config.executable.name)?;

    if config.executable.bin_dir.trim().is_empty() {
        return Err(TaskError::config_error_with_hint(
            "[executable] bin_dir cannot be empty",
            "Remove the key to use the default 'bin' directory",
        )
        .into());
    }

    if config.toolchain.go.trim().is_empty() || config.toolchain.git.trim().is_empty() {
        return Err(TaskError::config_error_with_hint(
            "[toolchain] programs cannot be empty",
            "Remove the key to use the default 'go' / 'git' from PATH",
        )
        .into());
    }

    let mut seen = HashSet::new();
    for target in &config.targets {
        if target.os.trim().is_empty() || target.arch.trim().is_empty() {
            return Err(TaskError::config_error_with_hint(
                format!("Target '{}' must have both os and arch", target),
                hints::invalid_config(),
            )
            .into());
        }
        validate_target_part("os", &target.os)?;
        validate_target_part("arch", &target.arch)?;

        // The label is the output directory name
        if !seen.insert(target.to_string()) {
            return Err(TaskError::config_error_with_hint(
                format!("Target '{}' is listed more than once", target),
                hints::invalid_config(),
            )
            .into());
        }
    }

    Ok(())
}

/// GOOS/GOARCH values become a `<os>-<arch>` directory under bin_dir, so
/// they are limited to `[a-z0-9_]`
fn validate_target_part(field: &str, value: &str) -> Result<()> {
    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        return Err(TaskError::config_error_with_hint(
            format!(
                "Target {} '{}' may only contain lowercase letters, digits and '_'",
                field, value
            ),
            "Use GOOS/GOARCH names such as os = \"linux\", arch = \"arm64\"",
        )
        .into());
    }
    Ok(())
}

fn validate_executable_name(name: &str) -> Result<()> {
    if name.contains('/') || name.contains('\\') {
        return Err(TaskError::config_error_with_hint(
            format!("Executable name '{}' cannot contain path separators", name),
            "Use [executable] bin_dir to change the output directory",
        )
        .into());
    }
    if name == "." || name == ".." {
        return Err(TaskError::config_error(format!(
            "Executable name '{}' is not a valid file name",
            name
        ))
        .into());
    }
    Ok(())
}
