//! Structured reporting of supervisor lifecycle milestones.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::readiness::ReadinessError;
use crate::supervisor::{ExitTrigger, SignalError, SpawnError, TerminationSignal};

const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait LifecycleReporter: Send + Sync {
    /// The dev-server port was chosen.
    fn port_resolved(&self, preferred: u16, resolved: u16);

    /// The readiness responder is listening.
    fn readiness_started(&self, addr: SocketAddr);

    /// The readiness responder could not be started.
    fn readiness_failed(&self, error: &ReadinessError);

    /// The readiness responder was closed.
    fn readiness_closed(&self);

    /// The dev server was spawned.
    fn child_spawned(&self, pid: u32, program: &str);

    /// The dev server could not be spawned.
    fn spawn_failed(&self, error: &SpawnError);

    /// Operator signals cannot be observed.
    fn signals_unavailable(&self, error: &SignalError);

    /// An operator signal was received.
    fn signal_received(&self, signal: TerminationSignal, forwarded: bool);

    /// A graceful shutdown of the child began.
    fn shutdown_requested(&self);

    /// The child outlived its graceful shutdown window and is being killed.
    fn escalated(&self, pid: u32);

    /// The exit code was decided.
    fn exit_decided(&self, trigger: &ExitTrigger, code: i32);
}

impl<T> LifecycleReporter for Arc<T>
where
    T: LifecycleReporter,
{
    fn port_resolved(&self, preferred: u16, resolved: u16) {
        (**self).port_resolved(preferred, resolved);
    }

    fn readiness_started(&self, addr: SocketAddr) {
        (**self).readiness_started(addr);
    }

    fn readiness_failed(&self, error: &ReadinessError) {
        (**self).readiness_failed(error);
    }

    fn readiness_closed(&self) {
        (**self).readiness_closed();
    }

    fn child_spawned(&self, pid: u32, program: &str) {
        (**self).child_spawned(pid, program);
    }

    fn spawn_failed(&self, error: &SpawnError) {
        (**self).spawn_failed(error);
    }

    fn signals_unavailable(&self, error: &SignalError) {
        (**self).signals_unavailable(error);
    }

    fn signal_received(&self, signal: TerminationSignal, forwarded: bool) {
        (**self).signal_received(signal, forwarded);
    }

    fn shutdown_requested(&self) {
        (**self).shutdown_requested();
    }

    fn escalated(&self, pid: u32) {
        (**self).escalated(pid);
    }

    fn exit_decided(&self, trigger: &ExitTrigger, code: i32) {
        (**self).exit_decided(trigger, code);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredLifecycleReporter;

impl StructuredLifecycleReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LifecycleReporter for StructuredLifecycleReporter {
    fn port_resolved(&self, preferred: u16, resolved: u16) {
        tracing::info!(
            target: LIFECYCLE_TARGET,
            event = "port_resolved",
            preferred,
            resolved,
            "dev server port resolved"
        );
    }

    fn readiness_started(&self, addr: SocketAddr) {
        tracing::info!(
            target: LIFECYCLE_TARGET,
            event = "readiness_started",
            addr = %addr,
            "readiness responder started"
        );
    }

    fn readiness_failed(&self, error: &ReadinessError) {
        tracing::warn!(
            target: LIFECYCLE_TARGET,
            event = "readiness_failed",
            error = %error,
            "readiness responder unavailable; continuing without it"
        );
    }

    fn readiness_closed(&self) {
        tracing::debug!(
            target: LIFECYCLE_TARGET,
            event = "readiness_closed",
            "readiness responder closed"
        );
    }

    fn child_spawned(&self, pid: u32, program: &str) {
        tracing::info!(
            target: LIFECYCLE_TARGET,
            event = "child_spawned",
            pid,
            program,
            "dev server started"
        );
    }

    fn spawn_failed(&self, error: &SpawnError) {
        tracing::error!(
            target: LIFECYCLE_TARGET,
            event = "spawn_failed",
            error = %error,
            "dev server failed to start"
        );
    }

    fn signals_unavailable(&self, error: &SignalError) {
        tracing::error!(
            target: LIFECYCLE_TARGET,
            event = "signals_unavailable",
            error = %error,
            "cannot observe termination signals; stopping dev server"
        );
    }

    fn signal_received(&self, signal: TerminationSignal, forwarded: bool) {
        tracing::info!(
            target: LIFECYCLE_TARGET,
            event = "signal_received",
            signal = %signal,
            forwarded,
            "termination requested by operator"
        );
    }

    fn shutdown_requested(&self) {
        tracing::info!(
            target: LIFECYCLE_TARGET,
            event = "shutdown_requested",
            "stopping dev server gracefully"
        );
    }

    fn escalated(&self, pid: u32) {
        tracing::warn!(
            target: LIFECYCLE_TARGET,
            event = "escalated",
            pid,
            "dev server ignored graceful shutdown; force-killing"
        );
    }

    fn exit_decided(&self, trigger: &ExitTrigger, code: i32) {
        tracing::info!(
            target: LIFECYCLE_TARGET,
            event = "exit_decided",
            trigger = ?trigger,
            code,
            "supervisor exit code decided"
        );
    }
}
