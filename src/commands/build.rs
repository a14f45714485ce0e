//! Build, debug and build-all command implementations

use anyhow::Result;
use clap::Args;

use crate::build::{build_all_tasks, build_target, BuildContext, BuildProfile, FanOut, Platform};
use crate::error::TaskError;
use crate::utils::terminal::{create_progress_bar, print_success};
use crate::utils::tools::require_tool;

/// Build a release executable for one platform
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// Target platform as os-arch (e.g. linux-arm64); defaults to this computer
    pub target: Option<String>,
}

impl BuildCommand {
    /// Execute the build command
    pub fn execute(self, ctx: &BuildContext) -> Result<()> {
        let platform = match self.target.as_deref() {
            Some(target) => resolve_target(ctx, target)?,
            None => Platform::host(),
        };
        build_one(ctx, &platform, BuildProfile::Release)
    }
}

/// Accept any configured target, or the host platform
fn resolve_target(ctx: &BuildContext, target: &str) -> Result<Platform> {
    let unknown = || TaskError::UnknownTarget {
        target: target.to_string(),
        available: ctx.config.target_labels(),
    };

    let platform: Platform = target.parse().map_err(|_| unknown())?;
    if ctx.config.find_target(&platform).is_some() || platform == Platform::host() {
        Ok(platform)
    } else {
        Err(unknown().into())
    }
}

/// Build a single executable and report where it went
pub fn build_one(ctx: &BuildContext, platform: &Platform, profile: BuildProfile) -> Result<()> {
    require_tool(ctx.go(), "building")?;

    if ctx.verbose {
        eprintln!("Building {} ({}) for {}...", ctx.config.name(), profile, platform);
    }

    build_target(ctx, platform, profile)?;
    print_success(&format!(
        "built {}",
        ctx.output_path(platform, profile).display()
    ));
    Ok(())
}

/// Build a debug executable for this computer
pub fn build_debug(ctx: &BuildContext) -> Result<()> {
    build_one(ctx, &Platform::host(), BuildProfile::Debug)
}

/// Build every configured target concurrently, plus the host debug build
pub fn build_all(ctx: &BuildContext) -> Result<()> {
    require_tool(ctx.go(), "building")?;

    let tasks = build_all_tasks(ctx);

    eprintln!("\n{}", "=".repeat(80));
    eprintln!("Building {} for ALL targets", ctx.config.name());
    eprintln!("{}", "=".repeat(80));
    eprintln!(
        "\nWill build {} targets: {}",
        tasks.len(),
        tasks
            .iter()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let progress = create_progress_bar(tasks.len() as u64, "Building");
    let report = FanOut::new(tasks).with_progress(progress).run();
    report.print_summary("BUILD ALL SUMMARY");

    report.into_result()?;

    eprintln!("\n🎉 All targets built successfully!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GotasksConfig;
    use std::path::PathBuf;

    fn context() -> BuildContext {
        let mut config = GotasksConfig::default();
        config.executable.name = "example".to_string();
        config.targets = vec![Platform::new("windows", "amd64")];
        BuildContext::new(PathBuf::from("/project"), config, false)
    }

    #[test]
    fn test_resolve_configured_target() {
        let ctx = context();
        assert_eq!(
            resolve_target(&ctx, "windows/amd64").unwrap(),
            Platform::new("windows", "amd64")
        );
    }

    #[test]
    fn test_resolve_host_target() {
        let ctx = context();
        let host = Platform::host();
        assert_eq!(resolve_target(&ctx, &host.to_string()).unwrap(), host);
    }

    #[test]
    fn test_resolve_unknown_target() {
        let ctx = context();
        let err = resolve_target(&ctx, "plan9-mips").unwrap_err();
        match err.downcast_ref::<TaskError>() {
            Some(TaskError::UnknownTarget { target, available }) => {
                assert_eq!(target, "plan9-mips");
                assert_eq!(available, &vec!["windows-amd64".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(resolve_target(&ctx, "garbage").is_err());
    }
}
