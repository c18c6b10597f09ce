//! tower-pod binary
//!
//! Started by the host interpreter; stdin and stdout carry the protocol, so
//! all logging goes to the pod log file.

use tracing::{error, info};

use tower_pod::{ConfigLoader, Pod};
use tower_pod_utils::{init_logging_with_config, LogConfig, PodError, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging_with_config(LogConfig::pod())?;
    info!(version = env!("CARGO_PKG_VERSION"), "tower-pod starting");

    let config = ConfigLoader::load_and_validate().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    let pod = Pod::from_config(&config).map_err(|e| {
        error!(error = %e, "Failed to build API client");
        PodError::internal(e.to_string())
    })?;

    match pod.serve(tokio::io::stdin(), tokio::io::stdout()).await {
        Ok(stop) => {
            info!(?stop, "tower-pod exiting");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Fatal protocol error");
            Err(PodError::protocol(e.to_string()))
        }
    }
}
