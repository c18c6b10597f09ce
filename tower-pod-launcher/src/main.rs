//! tower-pod-launcher: run a babashka task, fetching babashka if needed

mod download;
mod platform;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use tower_pod_utils::{cache_dir, init_logging_with_config, LogConfig};

use crate::platform::Platform;

/// Version used when neither `--bb-version` nor `BB_VERSION` is given;
/// release builds may pin it through the `BB_VERSION` build environment
const DEFAULT_BB_VERSION: &str = match option_env!("BB_VERSION") {
    Some(version) => version,
    None => "1.12.196",
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// babashka release to run
    #[arg(long, env = "BB_VERSION", default_value = DEFAULT_BB_VERSION)]
    bb_version: String,

    /// Task to run
    #[arg(long, env = "bb_task", default_value = "sync")]
    task: String,

    /// Extra task arguments, whitespace-separated
    #[arg(long, env = "bb_args", default_value = "")]
    args: String,

    /// Verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Command line for the interpreter, after the binary itself
    fn command_args(&self) -> Vec<&str> {
        std::iter::once(self.task.as_str())
            .chain(self.args.split_whitespace())
            .collect()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_config = if args.verbose {
        LogConfig::development()
    } else {
        LogConfig::launcher()
    };
    init_logging_with_config(log_config).context("Failed to initialize logging")?;
    debug!(?args, "Launcher starting");

    let platform = Platform::detect()?;
    let bb = download::ensure_binary(&cache_dir(), &platform, &args.bb_version)
        .await
        .with_context(|| format!("Failed to obtain babashka v{}", args.bb_version))?;

    let command_args = args.command_args();
    info!(binary = %bb.display(), args = ?command_args, "Running task");

    let status = tokio::process::Command::new(&bb)
        .args(&command_args)
        .status()
        .await
        .with_context(|| format!("Failed to run {}", bb.display()))?;

    // A child killed by a signal has no code
    std::process::exit(status.code().unwrap_or(1));
}
