//! Release variant selection for the host platform

use tower_pod_utils::{PodError, Result};

/// A babashka release variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// e.g. `linux-amd64`
    pub variant: &'static str,
    /// Appended to the variant in archive names; Linux builds are static
    pub suffix: &'static str,
}

impl Platform {
    /// Platform of the running process
    pub fn detect() -> Result<Self> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map an OS/architecture pair, accepting both Rust and uname spellings
    pub fn from_parts(os: &str, arch: &str) -> Result<Self> {
        let os_lower = os.to_lowercase();
        let arch_lower = arch.to_lowercase();

        let (variant, suffix) = match (os_lower.as_str(), arch_lower.as_str()) {
            ("linux", "x86_64" | "amd64") => ("linux-amd64", "-static"),
            ("linux", "aarch64" | "arm64") => ("linux-aarch64", "-static"),
            ("macos" | "darwin", "x86_64" | "amd64") => ("macos-amd64", ""),
            ("macos" | "darwin", "aarch64" | "arm64") => ("macos-aarch64", ""),
            _ => {
                return Err(PodError::UnsupportedPlatform {
                    os: os.to_string(),
                    arch: arch.to_string(),
                })
            }
        };

        Ok(Self { variant, suffix })
    }
}
