//! Path utilities for tower-pod
//!
//! Handles XDG Base Directory specification compliance for config,
//! state and cache directories.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Application identifier for XDG directories
const APP_NAME: &str = "tower-pod";

/// Get project directories
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Get the configuration directory
///
/// Location: `$XDG_CONFIG_HOME/tower-pod` or `~/.config/tower-pod`
pub fn config_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.config_dir().to_path_buf())
        .unwrap_or_else(fallback_config_dir)
}

/// Get the main configuration file path
///
/// Location: `$XDG_CONFIG_HOME/tower-pod/config.toml`
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the state directory
///
/// Location: `$XDG_STATE_HOME/tower-pod` or `~/.local/state/tower-pod`
pub fn state_dir() -> PathBuf {
    project_dirs()
        .and_then(|p| p.state_dir().map(|d| d.to_path_buf()))
        .unwrap_or_else(fallback_state_dir)
}

/// Get the cache directory (downloaded interpreters, safe to delete)
///
/// Location: `$XDG_CACHE_HOME/tower-pod` or `~/.cache/tower-pod`
pub fn cache_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.cache_dir().to_path_buf())
        .unwrap_or_else(fallback_cache_dir)
}

/// Get the log directory
///
/// Location: `$XDG_STATE_HOME/tower-pod/log` or `~/.local/state/tower-pod/log`
pub fn log_dir() -> PathBuf {
    state_dir().join("log")
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

// Fallback implementations when ProjectDirs is unavailable

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

fn fallback_config_dir() -> PathBuf {
    home_dir().join(".config").join(APP_NAME)
}

fn fallback_state_dir() -> PathBuf {
    home_dir().join(".local").join("state").join(APP_NAME)
}

fn fallback_cache_dir() -> PathBuf {
    home_dir().join(".cache").join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_in_config_dir() {
        let file = config_file();
        assert!(file.starts_with(config_dir()));
        assert_eq!(file.file_name().unwrap().to_str().unwrap(), "config.toml");
    }

    #[test]
    fn test_log_dir_in_state_dir() {
        assert!(log_dir().starts_with(state_dir()));
        assert!(log_dir().ends_with("log"));
    }

    #[test]
    fn test_dirs_contain_app_name() {
        assert!(config_dir().to_string_lossy().contains(APP_NAME));
        assert!(state_dir().to_string_lossy().contains(APP_NAME));
        assert!(cache_dir().to_string_lossy().contains(APP_NAME));
    }

    #[test]
    fn test_fallback_dirs() {
        assert!(fallback_config_dir().ends_with(".config/tower-pod"));
        assert!(fallback_state_dir().ends_with(".local/state/tower-pod"));
        assert!(fallback_cache_dir().ends_with(".cache/tower-pod"));
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Idempotent
        ensure_dir(&nested).unwrap();
    }
}
