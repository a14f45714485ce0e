//! Gotasks.toml configuration parsing
//!
//! # Example
//!
//! ```toml
//! [executable]
//! name = "example"
//! package = "./cmd/example"
//! bin_dir = "bin"
//!
//! [build]
//! release_tags = ["release"]
//! debug_tags = ["debug"]
//! flags = ["-trimpath"]
//!
//! [toolchain]
//! go = "go"
//! git = "git"
//!
//! [[targets]]
//! os = "linux"
//! arch = "amd64"
//!
//! [[targets]]
//! os = "windows"
//! arch = "amd64"
//! ```
//!
//! Every section is optional. Without a `[[targets]]` list the five
//! windows/darwin/linux defaults are built.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::validation::validate_config;
use crate::build::platform::{default_targets, Platform};
use crate::error::{hints, TaskError};

/// Configuration file name looked up at the project root
pub const CONFIG_FILE: &str = "Gotasks.toml";

/// Root configuration from Gotasks.toml
#[derive(Debug, Clone, Deserialize)]
pub struct GotasksConfig {
    /// What to build and where to put it
    #[serde(default)]
    pub executable: ExecutableConfig,

    /// Build tags and extra `go build` flags
    #[serde(default)]
    pub build: BuildConfig,

    /// External programs
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// Cross-compilation targets built by `build-all`
    #[serde(default = "default_targets")]
    pub targets: Vec<Platform>,
}

/// Executable configuration from [executable] section
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutableConfig {
    /// Executable name; empty means "use the project directory name"
    #[serde(default)]
    pub name: String,

    /// Go package passed to `go build`
    #[serde(default = "default_package")]
    pub package: String,

    /// Output directory, relative to the project root
    #[serde(default = "default_bin_dir")]
    pub bin_dir: String,
}

impl Default for ExecutableConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            package: default_package(),
            bin_dir: default_bin_dir(),
        }
    }
}

/// Build configuration from [build] section
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// Tags for release builds
    #[serde(default = "default_release_tags")]
    pub release_tags: Vec<String>,

    /// Tags for debug builds
    #[serde(default = "default_debug_tags")]
    pub debug_tags: Vec<String>,

    /// Extra arguments inserted before the package in `go build`
    #[serde(default)]
    pub flags: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            release_tags: default_release_tags(),
            debug_tags: default_debug_tags(),
            flags: Vec::new(),
        }
    }
}

/// Toolchain configuration from [toolchain] section
#[derive(Debug, Clone, Deserialize)]
pub struct ToolchainConfig {
    /// Go toolchain program
    #[serde(default = "default_go")]
    pub go: String,

    /// Version control program
    #[serde(default = "default_git")]
    pub git: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            go: default_go(),
            git: default_git(),
        }
    }
}

fn default_package() -> String {
    ".".to_string()
}

fn default_bin_dir() -> String {
    "bin".to_string()
}

fn default_release_tags() -> Vec<String> {
    vec!["release".to_string()]
}

fn default_debug_tags() -> Vec<String> {
    vec!["debug".to_string()]
}

fn default_go() -> String {
    "go".to_string()
}

fn default_git() -> String {
    "git".to_string()
}

impl Default for GotasksConfig {
    fn default() -> Self {
        Self {
            executable: ExecutableConfig::default(),
            build: BuildConfig::default(),
            toolchain: ToolchainConfig::default(),
            targets: default_targets(),
        }
    }
}

impl GotasksConfig {
    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Invalid {}", path.display()))
    }

    /// Load the project's configuration
    ///
    /// An explicit path must exist. Otherwise Gotasks.toml at the project root
    /// is read when present and defaults are used when it is not.
    pub fn load_for_project(project_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let config_path = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project_root.join(CONFIG_FILE));
        let mut config = if explicit.is_some() || config_path.is_file() {
            tracing::debug!(path = %config_path.display(), "loading configuration");
            Self::load_from_path(&config_path)?
        } else {
            tracing::debug!(root = %project_root.display(), "no {} found, using defaults", CONFIG_FILE);
            Self::default()
        };
        config.fill_name_from(project_root);
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(|e| {
            TaskError::config_error_with_hint(
                format!("Failed to parse {}: {}", CONFIG_FILE, e.message()),
                hints::invalid_config(),
            )
        })?;
        config.normalize_targets();
        validate_config(&config)?;
        Ok(config)
    }

    /// Targets compare and print the same way the command line parses them
    fn normalize_targets(&mut self) {
        for target in &mut self.targets {
            target.os = target.os.trim().to_lowercase();
            target.arch = target.arch.trim().to_lowercase();
        }
    }

    /// Use the project directory name when no executable name was configured
    pub fn fill_name_from(&mut self, project_root: &Path) {
        if !self.executable.name.is_empty() {
            return;
        }
        self.executable.name = project_root
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("app")
            .to_string();
    }

    /// Configured executable name
    pub fn name(&self) -> &str {
        &self.executable.name
    }

    /// Find a configured target by its `os-arch` label
    pub fn find_target(&self, platform: &Platform) -> Option<&Platform> {
        self.targets.iter().find(|t| *t == platform)
    }

    /// Labels of all configured targets
    pub fn target_labels(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = GotasksConfig::parse("").unwrap();
        assert_eq!(config.executable.package, ".");
        assert_eq!(config.executable.bin_dir, "bin");
        assert_eq!(config.build.release_tags, vec!["release"]);
        assert_eq!(config.build.debug_tags, vec!["debug"]);
        assert_eq!(config.toolchain.go, "go");
        assert_eq!(config.toolchain.git, "git");
        assert_eq!(config.targets, default_targets());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[executable]
name = "example"
package = "./cmd/example"
bin_dir = "out"

[build]
release_tags = ["release", "netgo"]
flags = ["-trimpath"]

[toolchain]
go = "go1.22"

[[targets]]
os = "linux"
arch = "riscv64"
"#;

        let config = GotasksConfig::parse(toml).unwrap();
        assert_eq!(config.name(), "example");
        assert_eq!(config.executable.package, "./cmd/example");
        assert_eq!(config.executable.bin_dir, "out");
        assert_eq!(config.build.release_tags, vec!["release", "netgo"]);
        assert_eq!(config.build.debug_tags, vec!["debug"]);
        assert_eq!(config.build.flags, vec!["-trimpath"]);
        assert_eq!(config.toolchain.go, "go1.22");
        assert_eq!(config.toolchain.git, "git");
        assert_eq!(config.targets, vec![Platform::new("linux", "riscv64")]);
    }

    #[test]
    fn test_parse_lowercases_targets() {
        let toml = r#"
[[targets]]
os = "Linux"
arch = "AMD64"
"#;
        let config = GotasksConfig::parse(toml).unwrap();
        assert_eq!(config.targets, vec![Platform::new("linux", "amd64")]);

        let requested: Platform = "Linux-amd64".parse().unwrap();
        assert!(config.find_target(&requested).is_some());
    }

    #[test]
    fn test_parse_rejects_case_only_duplicates() {
        let toml = r#"
[[targets]]
os = "linux"
arch = "arm64"

[[targets]]
os = "LINUX"
arch = "arm64"
"#;
        let err = GotasksConfig::parse(toml).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = GotasksConfig::parse("[executable\nname = 1").unwrap_err();
        assert!(err.to_string().contains("Failed to parse Gotasks.toml"));
    }

    #[test]
    fn test_parse_rejects_duplicate_targets() {
        let toml = r#"
[[targets]]
os = "linux"
arch = "amd64"

[[targets]]
os = "linux"
arch = "amd64"
"#;
        let err = GotasksConfig::parse(toml).unwrap_err();
        assert!(err.to_string().contains("linux-amd64"));
    }

    #[test]
    fn test_fill_name_from_project_dir() {
        let mut config = GotasksConfig::default();
        config.fill_name_from(Path::new("/work/hello-world"));
        assert_eq!(config.name(), "hello-world");

        config.executable.name = "explicit".to_string();
        config.fill_name_from(Path::new("/work/other"));
        assert_eq!(config.name(), "explicit");
    }

    #[test]
    fn test_load_for_project_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = GotasksConfig::load_for_project(dir.path(), None).unwrap();
        assert!(!config.name().is_empty());
        assert_eq!(config.targets.len(), 5);
    }

    #[test]
    fn test_load_for_project_with_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[executable]\nname = \"tool\"\n\n[[targets]]\nos = \"windows\"\narch = \"arm64\"\n",
        )
        .unwrap();

        let config = GotasksConfig::load_for_project(dir.path(), None).unwrap();
        assert_eq!(config.name(), "tool");
        assert_eq!(config.target_labels(), vec!["windows-arm64"]);
        assert!(config.find_target(&Platform::new("windows", "arm64")).is_some());
        assert!(config.find_target(&Platform::new("linux", "amd64")).is_none());
    }

    #[test]
    fn test_load_for_project_explicit_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = GotasksConfig::load_for_project(dir.path(), Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration"));
    }
}
