//! Operator termination signals and their OS listener.

use std::fmt;
use std::io;
use std::thread;

use nix::sys::signal::Signal;
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::info;

use super::SUPERVISOR_TARGET;
use super::events::EventSender;

/// Termination signals the supervisor listens for and forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TerminationSignal {
    /// `SIGINT`, typically Ctrl-C.
    Interrupt,
    /// `SIGTERM`, sent by orchestrators and container runtimes.
    Terminate,
    /// `SIGHUP`, sent when the controlling terminal goes away.
    Hangup,
}

impl TerminationSignal {
    /// Every signal the supervisor registers for.
    pub const ALL: [Self; 3] = [Self::Interrupt, Self::Terminate, Self::Hangup];

    /// Raw signal number.
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        match self {
            Self::Interrupt => SIGINT,
            Self::Terminate => SIGTERM,
            Self::Hangup => SIGHUP,
        }
    }

    /// Maps a raw signal number back onto a termination signal.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            SIGINT => Some(Self::Interrupt),
            SIGTERM => Some(Self::Terminate),
            SIGHUP => Some(Self::Hangup),
            _ => None,
        }
    }

    /// Conventional signal name, such as `SIGINT`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
            Self::Hangup => "SIGHUP",
        }
    }

    pub(crate) const fn as_nix(self) -> Signal {
        match self {
            Self::Interrupt => Signal::SIGINT,
            Self::Terminate => Signal::SIGTERM,
            Self::Hangup => Signal::SIGHUP,
        }
    }
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Errors reported while installing signal listeners.
#[derive(Debug, Error)]
pub enum SignalError {
    /// Registering the OS signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Spawning the listener thread failed.
    #[error("failed to spawn signal listener thread: {source}")]
    Listener {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Source of operator termination signals.
pub trait SignalSource {
    /// Starts delivering each received signal to `events`.
    fn install(&self, events: EventSender) -> Result<(), SignalError>;
}

/// Listens for real OS signals via `signal-hook`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSignalSource;

impl SystemSignalSource {
    /// Builds a new signal source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SignalSource for SystemSignalSource {
    fn install(&self, events: EventSender) -> Result<(), SignalError> {
        let mut signals = Signals::new(TerminationSignal::ALL.map(TerminationSignal::as_raw))
            .map_err(|source| SignalError::Install { source })?;
        thread::Builder::new()
            .name("devstart-signals".to_owned())
            .spawn(move || {
                for raw in signals.forever() {
                    let Some(signal) = TerminationSignal::from_raw(raw) else {
                        continue;
                    };
                    info!(
                        target: SUPERVISOR_TARGET,
                        signal = %signal,
                        "termination signal received"
                    );
                    if !events.signal(signal) {
                        return;
                    }
                }
                // The iterator only ends once the handle is closed.
                events.request_shutdown();
            })
            .map_err(|source| SignalError::Listener { source })?;
        Ok(())
    }
}
