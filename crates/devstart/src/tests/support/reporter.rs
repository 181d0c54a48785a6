//! Test double for [`LifecycleReporter`] that records events for assertions.

use std::net::SocketAddr;
use std::sync::Mutex;

use crate::readiness::ReadinessError;
use crate::reporter::LifecycleReporter;
use crate::supervisor::{ExitTrigger, SignalError, SpawnError, TerminationSignal};

/// Lifecycle events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    PortResolved { preferred: u16, resolved: u16 },
    ReadinessStarted(SocketAddr),
    ReadinessFailed(String),
    ReadinessClosed,
    ChildSpawned { pid: u32, program: String },
    SpawnFailed(String),
    SignalsUnavailable(String),
    SignalReceived {
        signal: TerminationSignal,
        forwarded: bool,
    },
    ShutdownRequested,
    Escalated(u32),
    ExitDecided { trigger: ExitTrigger, code: i32 },
}

#[derive(Debug, Default)]
pub struct RecordingLifecycleReporter {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl RecordingLifecycleReporter {
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .expect("lifecycle reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: LifecycleEvent) {
        self.events
            .lock()
            .expect("lifecycle reporter mutex poisoned")
            .push(event);
    }
}

impl LifecycleReporter for RecordingLifecycleReporter {
    fn port_resolved(&self, preferred: u16, resolved: u16) {
        self.record(LifecycleEvent::PortResolved {
            preferred,
            resolved,
        });
    }

    fn readiness_started(&self, addr: SocketAddr) {
        self.record(LifecycleEvent::ReadinessStarted(addr));
    }

    fn readiness_failed(&self, error: &ReadinessError) {
        self.record(LifecycleEvent::ReadinessFailed(error.to_string()));
    }

    fn readiness_closed(&self) {
        self.record(LifecycleEvent::ReadinessClosed);
    }

    fn child_spawned(&self, pid: u32, program: &str) {
        self.record(LifecycleEvent::ChildSpawned {
            pid,
            program: program.to_owned(),
        });
    }

    fn spawn_failed(&self, error: &SpawnError) {
        self.record(LifecycleEvent::SpawnFailed(error.to_string()));
    }

    fn signals_unavailable(&self, error: &SignalError) {
        self.record(LifecycleEvent::SignalsUnavailable(error.to_string()));
    }

    fn signal_received(&self, signal: TerminationSignal, forwarded: bool) {
        self.record(LifecycleEvent::SignalReceived { signal, forwarded });
    }

    fn shutdown_requested(&self) {
        self.record(LifecycleEvent::ShutdownRequested);
    }

    fn escalated(&self, pid: u32) {
        self.record(LifecycleEvent::Escalated(pid));
    }

    fn exit_decided(&self, trigger: &ExitTrigger, code: i32) {
        self.record(LifecycleEvent::ExitDecided {
            trigger: *trigger,
            code,
        });
    }
}
