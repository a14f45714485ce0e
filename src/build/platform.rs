//! Target platform model using Go's GOOS/GOARCH naming

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// An (operating system, architecture) pair, e.g. `linux`/`amd64`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Platform {
    /// GOOS value (linux, darwin, windows, ...)
    pub os: String,
    /// GOARCH value (amd64, arm64, 386, ...)
    pub arch: String,
}

impl Platform {
    /// Create a platform from GOOS/GOARCH names
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this binary is running on, translated to Go names
    pub fn host() -> Self {
        Self::new(
            go_os(std::env::consts::OS),
            go_arch(std::env::consts::ARCH),
        )
    }

    /// Whether executables for this platform need the `.exe` suffix
    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    /// File suffix for executables on this platform
    pub fn executable_suffix(&self) -> &'static str {
        if self.is_windows() {
            ".exe"
        } else {
            ""
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

impl FromStr for Platform {
    type Err = TaskError;

    /// Parse `os-arch` or `os/arch`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s
            .split_once('/')
            .or_else(|| s.split_once('-'))
            .map(|(os, arch)| (os.trim(), arch.trim()))
            .filter(|(os, arch)| !os.is_empty() && !arch.is_empty());

        match parsed {
            Some((os, arch)) => Ok(Platform::new(os.to_lowercase(), arch.to_lowercase())),
            None => Err(TaskError::UnknownTarget {
                target: s.to_string(),
                available: Vec::new(),
            }),
        }
    }
}

/// Translate Rust's `std::env::consts::OS` into a GOOS value
fn go_os(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

/// Translate Rust's `std::env::consts::ARCH` into a GOARCH value
fn go_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}

/// Targets built by `build-all` when Gotasks.toml does not list any
pub fn default_targets() -> Vec<Platform> {
    vec![
        Platform::new("windows", "amd64"),
        Platform::new("darwin", "amd64"),
        Platform::new("darwin", "arm64"),
        Platform::new("linux", "amd64"),
        Platform::new("linux", "arm64"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dash_and_slash() {
        assert_eq!(
            "linux-arm64".parse::<Platform>().unwrap(),
            Platform::new("linux", "arm64")
        );
        assert_eq!(
            "Darwin/AMD64".parse::<Platform>().unwrap(),
            Platform::new("darwin", "amd64")
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("linux".parse::<Platform>().is_err());
        assert!("-amd64".parse::<Platform>().is_err());
        assert!("windows/".parse::<Platform>().is_err());
    }

    #[test]
    fn test_display_round_trips_label() {
        let platform = Platform::new("windows", "amd64");
        assert_eq!(platform.to_string(), "windows-amd64");
    }

    #[test]
    fn test_executable_suffix() {
        assert_eq!(Platform::new("windows", "arm64").executable_suffix(), ".exe");
        assert_eq!(Platform::new("linux", "amd64").executable_suffix(), "");
        assert_eq!(Platform::new("darwin", "arm64").executable_suffix(), "");
    }

    #[test]
    fn test_host_uses_go_names() {
        let host = Platform::host();
        assert_ne!(host.os, "macos");
        assert_ne!(host.arch, "x86_64");
        assert_ne!(host.arch, "aarch64");
    }

    #[test]
    fn test_default_targets_are_unique() {
        let targets = default_targets();
        let mut deduped = targets.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(targets.len(), 5);
        assert_eq!(deduped.len(), targets.len());
    }
}
