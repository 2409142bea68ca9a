//! Graceful shutdown signal handling

use std::{io, time::Duration};

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install Ctrl+C handler: {0}")]
    CtrlC(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    SigTerm(#[source] io::Error),

    #[cfg(windows)]
    #[error("failed to install Windows terminate handler: {0}")]
    Terminate(#[source] io::Error),
}

/// Waits for Ctrl+C or SIGTERM, then stops accepting connections and gives in-flight requests
/// `grace` to finish.
pub(crate) async fn listen(
    handle: ServerHandle,
    grace: Duration,
) -> Result<(), ShutdownSignalError> {
    let ctrl_c = async {
        signal::ctrl_c().await.map_err(ShutdownSignalError::CtrlC)
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .map_err(ShutdownSignalError::SigTerm)?
            .recv()
            .await;
        Ok::<(), ShutdownSignalError>(())
    };

    #[cfg(windows)]
    let terminate = async {
        signal::windows::ctrl_c()
            .map_err(ShutdownSignalError::Terminate)?
            .recv()
            .await;
        Ok::<(), ShutdownSignalError>(())
    };

    tokio::select! {
        result = ctrl_c => {
            result?;
            tracing::info!(grace_seconds = grace.as_secs(), "ctrl_c signal received, draining");
        }
        result = terminate => {
            result?;
            tracing::info!(grace_seconds = grace.as_secs(), "terminate signal received, draining");
        }
    };

    handle.stop_graceful(Some(grace));
    Ok(())
}
