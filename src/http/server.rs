//! HTTP server startup logic.

use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use axum::Router;
use axum_server::Handle;

use crate::config::AppConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {addr:?}: {source}")]
    Address {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to bind server to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install signal handlers: {0}")]
    Signal(#[source] std::io::Error),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// The single stdout line printed once the listener is bound.
pub fn startup_line(tag: &str, port: u16) -> String {
    format!("[{}] service listening on :{}", tag, port)
}

/// Resolve a `host:port` string to the first matching socket address.
pub async fn resolve(addr: &str) -> Result<SocketAddr, ServerError> {
    let mut addrs = tokio::net::lookup_host(addr)
        .await
        .map_err(|source| ServerError::Address {
            addr: addr.to_string(),
            source,
        })?;

    addrs.next().ok_or_else(|| ServerError::Address {
        addr: addr.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses resolved"),
    })
}

/// Bind a listener, reporting the address on failure.
///
/// A port already held by another process surfaces here as `ServerError::Bind`.
pub fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    let listener = TcpListener::bind(addr).map_err(|source| ServerError::Bind { addr, source })?;
    listener
        .set_nonblocking(true)
        .map_err(|source| ServerError::Bind { addr, source })?;
    Ok(listener)
}

/// Serve `app` on an already-bound listener until `handle` shuts it down.
pub async fn serve(listener: TcpListener, app: Router, handle: Handle) -> Result<(), ServerError> {
    axum_server::from_tcp(listener)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

/// Start the HTTP server based on configuration.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr = resolve(&config.http.bind_addr()).await?;
    let listener = bind(addr)?;
    let local_addr = listener.local_addr()?;

    let handle = Handle::new();
    shutdown::setup_shutdown_handler(
        handle.clone(),
        Duration::from_secs(config.http.shutdown_timeout_seconds),
    )
    .map_err(ServerError::Signal)?;

    println!("{}", startup_line(&config.service.tag, local_addr.port()));
    tracing::info!(
        addr = %local_addr,
        service = %config.service.tag,
        "Starting HTTP server"
    );

    serve(listener, app, handle).await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_line_matches_template_format() {
        assert_eq!(startup_line("rust", 3002), "[rust] service listening on :3002");
    }

    #[tokio::test]
    async fn resolves_localhost_and_literals() {
        let addr = resolve("127.0.0.1:3002").await.unwrap();
        assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 3002)));

        let addr = resolve("localhost:0").await.unwrap();
        assert!(addr.ip().is_loopback());
    }

    #[tokio::test]
    async fn rejects_address_without_port() {
        let err = resolve("127.0.0.1").await.unwrap_err();
        assert!(matches!(err, ServerError::Address { .. }));
    }

    #[test]
    fn second_bind_on_same_port_fails() {
        let first = bind(SocketAddr::from(([127, 0, 0, 1], 0))).unwrap();
        let taken = first.local_addr().unwrap();

        let err = bind(taken).unwrap_err();
        match err {
            ServerError::Bind { addr, source } => {
                assert_eq!(addr, taken);
                assert_eq!(source.kind(), std::io::ErrorKind::AddrInUse);
            }
            other => panic!("expected bind error, got {other:?}"),
        }
    }
}
