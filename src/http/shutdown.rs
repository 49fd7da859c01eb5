//! Graceful shutdown and signal handling.

use std::time::Duration;

use axum_server::Handle;

/// Setup graceful shutdown on SIGTERM and SIGINT.
///
/// Signal streams are registered before this returns, so a signal arriving
/// right after the startup line is never lost to the default disposition.
/// When either signal is received, the server will:
/// 1. Stop accepting new connections
/// 2. Wait up to `timeout` for existing connections to complete
/// 3. Shutdown
#[cfg(unix)]
pub fn setup_shutdown_handler(handle: Handle, timeout: Duration) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.recv() => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
            }
            _ = terminate.recv() => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
        }

        drain(handle, timeout);
    });

    Ok(())
}

#[cfg(not(unix))]
pub fn setup_shutdown_handler(handle: Handle, timeout: Duration) -> std::io::Result<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                drain(handle, timeout);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            }
        }
    });

    Ok(())
}

fn drain(handle: Handle, timeout: Duration) {
    handle.graceful_shutdown(Some(timeout));
    tracing::info!(
        timeout_secs = timeout.as_secs(),
        "Graceful shutdown initiated, waiting for connections to close"
    );
}
