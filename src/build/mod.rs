//! Go build orchestration
//!
//! ## Architecture
//!
//! ```text
//! commands/build.rs → build/mod.rs (one target) → go build
//!                   → build/fanout.rs (all targets, one thread each)
//! ```
//!
//! Every build writes to `<bin_dir>/<os>-<arch>/<name>[.exe]` and passes
//! its own `GOOS`/`GOARCH` to the toolchain, so concurrent builds never
//! share an output path or an environment.

pub mod fanout;
pub mod platform;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::GotasksConfig;
use crate::error::TaskError;
use crate::exec::{command_line, run_command, EnvMap};
use crate::utils::paths::{ensure_dir, find_project_root};

pub use fanout::{BuildTask, FanOut};
pub use platform::Platform;

/// Release or debug flavour of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildProfile {
    /// Release tags, plain executable name
    Release,
    /// Debug tags, `<name>.debug`
    Debug,
}

impl BuildProfile {
    /// Build tags for this profile
    pub fn tags(self, config: &GotasksConfig) -> &[String] {
        match self {
            BuildProfile::Release => &config.build.release_tags,
            BuildProfile::Debug => &config.build.debug_tags,
        }
    }

    /// Executable base name for this profile
    pub fn executable_name(self, name: &str) -> String {
        match self {
            BuildProfile::Release => name.to_string(),
            BuildProfile::Debug => format!("{}.debug", name),
        }
    }
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildProfile::Release => write!(f, "release"),
            BuildProfile::Debug => write!(f, "debug"),
        }
    }
}

/// Path of an executable: `<bin_dir>/<os>-<arch>/<name>[.exe]`
pub fn executable_path(bin_dir: &Path, platform: &Platform, name: &str) -> PathBuf {
    bin_dir
        .join(platform.to_string())
        .join(format!("{}{}", name, platform.executable_suffix()))
}

/// Build context containing the project root and its configuration
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Project root directory (where Gotasks.toml or go.mod is located)
    pub project_root: PathBuf,
    /// Loaded project configuration
    pub config: GotasksConfig,
    /// Verbose output
    pub verbose: bool,
}

impl BuildContext {
    /// Create a new build context
    pub fn new(project_root: PathBuf, config: GotasksConfig, verbose: bool) -> Self {
        Self {
            project_root,
            config,
            verbose,
        }
    }

    /// Resolve the project root and load its configuration
    ///
    /// With an explicit config file, the project root is the directory that
    /// contains it.
    pub fn load(config_path: Option<&Path>, verbose: bool) -> Result<Self> {
        let project_root = match config_path {
            Some(path) => {
                let absolute = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    std::env::current_dir()
                        .context("Failed to get current directory")?
                        .join(path)
                };
                absolute
                    .parent()
                    .map(Path::to_path_buf)
                    .context("Configuration path has no parent directory")?
            }
            None => find_project_root()?,
        };

        let config = GotasksConfig::load_for_project(&project_root, config_path)?;
        tracing::debug!(root = %project_root.display(), name = config.name(), "project resolved");
        Ok(Self::new(project_root, config, verbose))
    }

    /// Go toolchain program
    pub fn go(&self) -> &str {
        &self.config.toolchain.go
    }

    /// Version control program
    pub fn git(&self) -> &str {
        &self.config.toolchain.git
    }

    /// Output directory relative to the project root
    pub fn bin_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.executable.bin_dir)
    }

    /// Executable path for a platform and profile, relative to the project root
    pub fn output_path(&self, platform: &Platform, profile: BuildProfile) -> PathBuf {
        executable_path(
            &self.bin_dir(),
            platform,
            &profile.executable_name(self.config.name()),
        )
    }

    /// Arguments for `go build`
    pub fn go_build_args(&self, platform: &Platform, profile: BuildProfile) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "-o".to_string(),
            self.output_path(platform, profile).display().to_string(),
        ];

        let tags = profile.tags(&self.config);
        if !tags.is_empty() {
            args.push("-tags".to_string());
            args.push(tags.join(","));
        }

        args.extend(self.config.build.flags.iter().cloned());
        args.push(self.config.executable.package.clone());
        args
    }
}

/// Environment overrides that select the cross-compilation target
pub fn target_env(platform: &Platform) -> EnvMap {
    let mut env = EnvMap::new();
    env.insert("GOOS".to_string(), platform.os.clone());
    env.insert("GOARCH".to_string(), platform.arch.clone());
    env
}

/// Compile the program for one platform and profile
///
/// Returns the absolute path of the produced executable.
pub fn build_target(ctx: &BuildContext, platform: &Platform, profile: BuildProfile) -> Result<PathBuf> {
    let output = ctx.project_root.join(ctx.output_path(platform, profile));
    if let Some(parent) = output.parent() {
        ensure_dir(parent)?;
    }

    let args = ctx.go_build_args(platform, profile);
    let result = run_command(ctx.go(), &args, &target_env(platform), &ctx.project_root, false)?;

    if !result.success {
        return Err(TaskError::CommandFailed {
            command: command_line(ctx.go(), &args),
            exit_code: result.exit_code,
            output: result.combined_output(),
        }
        .into());
    }

    let printed = result.combined_output();
    if !printed.trim().is_empty() {
        print!("{}", printed);
    }

    Ok(output)
}

/// Tasks for `build-all`: every configured target in release plus a host debug build
pub fn build_all_tasks(ctx: &BuildContext) -> Vec<BuildTask<'_>> {
    let mut tasks: Vec<BuildTask<'_>> = ctx
        .config
        .targets
        .iter()
        .map(|platform| {
            BuildTask::new(platform.to_string(), move || {
                build_target(ctx, platform, BuildProfile::Release).map(|_| ())
            })
        })
        .collect();

    let host = Platform::host();
    tasks.push(BuildTask::new(format!("{} (debug)", host), move || {
        build_target(ctx, &host, BuildProfile::Debug).map(|_| ())
    }));

    tasks
}
