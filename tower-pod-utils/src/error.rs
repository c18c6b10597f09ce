//! Error types for tower-pod
//!
//! Provides a unified error type used across the pod, the launcher and
//! their shared setup code.

use std::path::PathBuf;

/// Main error type for tower-pod operations
#[derive(Debug, thiserror::Error)]
pub enum PodError {
    // === IO Errors ===

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Protocol Errors ===

    #[error("Protocol error: {0}")]
    Protocol(String),

    // === Configuration Errors ===

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    // === Launcher Errors ===

    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Download failed: {0}")]
    Download(String),

    // === Internal Errors ===

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PodError {
    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a download error
    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Download(_))
    }
}

/// Result type alias using PodError
pub type Result<T> = std::result::Result<T, PodError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Display Tests ====================

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = PodError::Io(io_err);
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err = PodError::FileRead {
            path: PathBuf::from("/etc/tower-pod/config.toml"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/etc/tower-pod/config.toml"));
    }

    #[test]
    fn test_error_display_file_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err = PodError::FileWrite {
            path: PathBuf::from("/root/pod.log"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to write file"));
        assert!(msg.contains("/root/pod.log"));
    }

    #[test]
    fn test_error_display_protocol() {
        let err = PodError::Protocol("truncated message".into());
        assert_eq!(err.to_string(), "Protocol error: truncated message");
    }

    #[test]
    fn test_error_display_config() {
        let err = PodError::Config("missing key".into());
        assert_eq!(err.to_string(), "Configuration error: missing key");
    }

    #[test]
    fn test_error_display_config_invalid() {
        let err = PodError::ConfigInvalid {
            path: PathBuf::from("/home/user/.config/tower-pod/config.toml"),
            message: "syntax error".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid configuration"));
        assert!(msg.contains("config.toml"));
        assert!(msg.contains("syntax error"));
    }

    #[test]
    fn test_error_display_unsupported_platform() {
        let err = PodError::UnsupportedPlatform {
            os: "windows".into(),
            arch: "x86_64".into(),
        };
        assert_eq!(err.to_string(), "Unsupported platform: windows/x86_64");
    }

    #[test]
    fn test_error_display_internal() {
        let err = PodError::Internal("unexpected state".into());
        assert_eq!(err.to_string(), "Internal error: unexpected state");
    }

    // ==================== Retryable Tests ====================

    #[test]
    fn test_retryable() {
        assert!(PodError::download("connection reset").is_retryable());
        assert!(!PodError::config("bad").is_retryable());
        assert!(!PodError::UnsupportedPlatform {
            os: "plan9".into(),
            arch: "mips".into(),
        }
        .is_retryable());
    }

    // ==================== From Trait Tests ====================

    #[test]
    fn test_from_io_error_preserves_kind() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PodError = io_err.into();
        if let PodError::Io(inner) = err {
            assert_eq!(inner.kind(), std::io::ErrorKind::PermissionDenied);
        } else {
            panic!("Expected Io variant");
        }
    }

    // ==================== Helper Function Tests ====================

    #[test]
    fn test_protocol_helper() {
        let err = PodError::protocol("invalid frame header");
        assert!(matches!(err, PodError::Protocol(_)));
        assert_eq!(err.to_string(), "Protocol error: invalid frame header");
    }

    #[test]
    fn test_internal_helper() {
        let err = PodError::internal("invariant violated");
        assert!(matches!(err, PodError::Internal(_)));
        assert_eq!(err.to_string(), "Internal error: invariant violated");
    }
}
