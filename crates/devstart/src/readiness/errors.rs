//! Error types for readiness listener operations.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors surfaced while binding or starting the readiness responder.
#[derive(Debug, Error)]
pub enum ReadinessError {
    /// Binding the listener failed, usually because the port is taken.
    #[error("failed to bind readiness listener at {addr}: {source}")]
    Bind {
        /// Address the listener tried to claim.
        addr: SocketAddr,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Switching the listener to non-blocking mode failed.
    #[error("failed to enable non-blocking readiness listener: {source}")]
    NonBlocking {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Spawning the accept thread failed.
    #[error("failed to spawn readiness accept thread: {source}")]
    Thread {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}
