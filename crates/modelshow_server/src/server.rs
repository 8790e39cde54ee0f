//! # Server Lifecycle
//!
//! Bind, report, serve until Ctrl-C.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ServerConfig};
use crate::router::build_router;
use crate::startup;

/// Errors that stop the server.
#[derive(Error, Debug)]
pub enum ServeError {
    /// Configuration rejected while building the router.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The listen address could not be bound.
    #[error("cannot bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The accept loop failed.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Runs the server until Ctrl-C.
///
/// # Errors
///
/// Returns [`ServeError`] if the configuration is invalid, the address is
/// taken, or the accept loop fails.
pub async fn serve(config: ServerConfig) -> Result<(), ServeError> {
    config.validate()?;
    let addr = config.socket_addr();
    startup::report(&config);
    let app = build_router(config)?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServeError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown requested"),
        Err(e) => {
            tracing::error!(error = %e, "Cannot listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
