//! Errors raised while starting the dev-server child.

use std::io;

use thiserror::Error;

/// The dev server could not be started; this is never normalised to success.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// The executable could not be spawned (missing, not executable, ...).
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// Program the supervisor tried to run.
        program: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The thread reaping the child could not be started or stopped before
    /// taking ownership of it.
    #[error("failed to spawn child waiter thread: {source}")]
    Waiter {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}
