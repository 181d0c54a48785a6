//! Non-interactive supervisor for a frontend dev server.
//!
//! `devstart` launches the UI build tool's dev server in a CI-safe way. It
//! picks a free port near the preferred one, composes a restricted child
//! environment, optionally exposes a tiny readiness responder, and then
//! supervises the child until it stops.
//!
//! The interesting part is the exit code. Intentional stops (CI teardown,
//! container stop, Ctrl-C) must never register as failures, while genuine
//! crashes must still propagate. Every termination trigger is funnelled
//! through [`supervisor::normalise`] exactly once; see the
//! [`supervisor`] module for the event loop that enforces this.

pub mod environment;
pub mod ports;
pub mod readiness;
pub mod reporter;
pub mod supervisor;
mod telemetry;

use std::process::ExitCode;

pub use environment::{EnvironmentMap, compose_environment};
pub use ports::{PORT_SCAN_WINDOW, PortProbe, TcpPortProbe, find_free_port, find_free_port_with};
pub use readiness::{ReadinessError, ReadinessHandle, ReadinessServer};
pub use reporter::{LifecycleReporter, StructuredLifecycleReporter};
pub use supervisor::{
    ExitTrigger, Supervisor, SupervisorParts, SupervisorTimings, normalise, run_supervisor,
    run_supervisor_with,
};
pub use telemetry::{TelemetryError, TelemetryHandle, initialise as initialise_telemetry};

/// Converts a supervisor exit code into a process exit code.
///
/// Codes outside `0..=255` cannot be represented and become a failure.
#[must_use]
pub fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}

#[cfg(test)]
mod tests;
