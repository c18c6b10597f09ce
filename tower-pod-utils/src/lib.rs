//! tower-pod-utils: Common utilities shared across tower-pod crates
//!
//! This crate provides:
//! - Unified error types ([`PodError`], [`Result`])
//! - Logging infrastructure ([`init_logging_with_config`], [`LogConfig`])
//! - XDG-compliant path utilities ([`paths`] module)

pub mod error;
pub mod logging;
pub mod paths;

// Re-export main types at crate root for convenience
pub use error::{PodError, Result};
pub use logging::{init_logging_with_config, LogConfig, LogOutput};

// Re-export commonly used path functions
pub use paths::{cache_dir, config_dir, config_file, log_dir, state_dir};
