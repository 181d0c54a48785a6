//! Dev-server process supervision.
//!
//! The supervisor spawns the dev server, forwards operator termination
//! signals to it and decides its own exit code exactly once. Every event
//! source (signal listener, child waiter, internal shutdown requests) posts
//! into a single queue drained by [`Supervisor::run`], so the guard flags in
//! [`SupervisorState`] are only ever touched from one thread.

use std::time::Duration;

mod child;
mod errors;
mod events;
mod launch;
mod policy;
mod runtime;
mod signals;
mod state;

pub use self::child::{ChildExit, ChildHandle, LaunchSpec, Launcher, OsLauncher};
pub use self::errors::SpawnError;
pub use self::events::{EventSender, ShutdownRequester, SupervisorEvent};
pub use self::launch::{run_supervisor, run_supervisor_with};
pub use self::policy::{ExitTrigger, NORMALISED_EXIT_CODES, SPAWN_FAILURE_EXIT_CODE, normalise};
pub use self::runtime::{Supervisor, SupervisorParts, SupervisorTimings};
pub use self::signals::{SignalError, SignalSource, SystemSignalSource, TerminationSignal};
pub use self::state::{Phase, Settlement, SupervisorState};

pub(crate) const SUPERVISOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::supervisor");

/// Window the child gets to flush output after an operator signal before
/// the supervisor exits.
pub const GRACE_DELAY: Duration = Duration::from_millis(500);

/// Time a gracefully terminated child may take before it is force-killed.
pub const ESCALATION_TIMEOUT: Duration = Duration::from_secs(5);
