//! The supervisor event loop.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::readiness::ReadinessHandle;
use crate::reporter::LifecycleReporter;

use super::child::{ChildExit, ChildHandle, LaunchSpec, Launcher};
use super::events::{EventSender, ShutdownRequester, SupervisorEvent};
use super::policy::ExitTrigger;
use super::signals::{SignalSource, TerminationSignal};
use super::state::{Settlement, SupervisorState};
use super::{ESCALATION_TIMEOUT, GRACE_DELAY, SUPERVISOR_TARGET};

/// Timer lengths used by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorTimings {
    /// Delay between forwarding an operator signal and exiting.
    pub grace: Duration,
    /// Delay between a graceful terminate and the force-kill.
    pub escalation: Duration,
}

impl Default for SupervisorTimings {
    fn default() -> Self {
        Self {
            grace: GRACE_DELAY,
            escalation: ESCALATION_TIMEOUT,
        }
    }
}

/// Collaborators handed to [`Supervisor::new`].
pub struct SupervisorParts<L, S> {
    /// Starts the dev server.
    pub launcher: L,
    /// Delivers operator termination signals.
    pub signals: S,
    /// Receives lifecycle milestones.
    pub reporter: Arc<dyn LifecycleReporter>,
    /// What to launch.
    pub spec: LaunchSpec,
    /// Readiness responder to close when the run ends.
    pub readiness: Option<ReadinessHandle>,
}

#[derive(Debug, Default)]
struct Deadlines {
    exit_at: Option<Instant>,
    escalate_at: Option<Instant>,
}

impl Deadlines {
    fn next(&self) -> Option<Instant> {
        match (self.exit_at, self.escalate_at) {
            (Some(exit), Some(escalate)) => Some(exit.min(escalate)),
            (exit, escalate) => exit.or(escalate),
        }
    }

    fn take_escalation_due(&mut self, now: Instant) -> bool {
        let due = self.escalate_at.is_some_and(|at| at <= now);
        if due {
            self.escalate_at = None;
        }
        due
    }

    fn exit_due(&self, now: Instant) -> bool {
        self.exit_at.is_some_and(|at| at <= now)
    }
}

/// Owns one supervised run of the dev server.
pub struct Supervisor<L, S> {
    launcher: L,
    signals: S,
    reporter: Arc<dyn LifecycleReporter>,
    spec: LaunchSpec,
    readiness: Option<ReadinessHandle>,
    timings: SupervisorTimings,
    state: SupervisorState,
    events: EventSender,
    queue: Receiver<SupervisorEvent>,
}

impl<L, S> Supervisor<L, S>
where
    L: Launcher,
    S: SignalSource,
{
    /// Builds a supervisor with the default timings.
    #[must_use]
    pub fn new(parts: SupervisorParts<L, S>) -> Self {
        let (events, queue) = EventSender::channel();
        Self {
            launcher: parts.launcher,
            signals: parts.signals,
            reporter: parts.reporter,
            spec: parts.spec,
            readiness: parts.readiness,
            timings: SupervisorTimings::default(),
            state: SupervisorState::new(),
            events,
            queue,
        }
    }

    /// Overrides the grace and escalation delays.
    #[must_use]
    pub fn with_timings(mut self, timings: SupervisorTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Handle for requesting a graceful shutdown from another thread.
    #[must_use]
    pub fn shutdown_requester(&self) -> ShutdownRequester {
        ShutdownRequester::new(self.events.clone())
    }

    /// Runs the dev server to completion and returns the decided exit code.
    #[must_use]
    pub fn run(mut self) -> i32 {
        if let Err(error) = self.signals.install(self.events.clone()) {
            self.reporter.signals_unavailable(&error);
            self.events.request_shutdown();
        }
        let child = match self.launcher.launch(&self.spec, self.events.clone()) {
            Ok(child) => child,
            Err(error) => {
                self.reporter.spawn_failed(&error);
                return self.conclude(&ExitTrigger::SpawnFailure);
            }
        };
        self.reporter.child_spawned(child.id(), &self.spec.program);
        self.supervise(child.as_ref())
    }

    fn supervise(&mut self, child: &dyn ChildHandle) -> i32 {
        let mut deadlines = Deadlines::default();
        loop {
            let event = match deadlines.next() {
                Some(at) => {
                    let wait = at.saturating_duration_since(Instant::now());
                    match self.queue.recv_timeout(wait) {
                        Ok(event) => Some(event),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => return self.abandon(),
                    }
                }
                None => match self.queue.recv() {
                    Ok(event) => Some(event),
                    Err(_) => return self.abandon(),
                },
            };

            if let Some(event) = event
                && let Some(code) = self.dispatch(event, child, &mut deadlines)
            {
                return code;
            }

            let now = Instant::now();
            if deadlines.take_escalation_due(now) {
                self.escalate(child);
            }
            if deadlines.exit_due(now)
                && let Some(code) = self.state.decided()
            {
                return self.finish(code);
            }
        }
    }

    fn dispatch(
        &mut self,
        event: SupervisorEvent,
        child: &dyn ChildHandle,
        deadlines: &mut Deadlines,
    ) -> Option<i32> {
        match event {
            SupervisorEvent::Signal(signal) => {
                self.on_signal(signal, child, deadlines);
                None
            }
            SupervisorEvent::ChildExited(exit) => {
                deadlines.escalate_at = None;
                self.on_child_exit(exit)
            }
            SupervisorEvent::ShutdownRequested => {
                self.on_shutdown_request(child, deadlines);
                None
            }
        }
    }

    fn on_signal(
        &mut self,
        signal: TerminationSignal,
        child: &dyn ChildHandle,
        deadlines: &mut Deadlines,
    ) {
        if !self.state.claim_signal(signal) {
            debug!(
                target: SUPERVISOR_TARGET,
                signal = %signal,
                "ignoring repeated termination signal"
            );
            return;
        }
        self.state.begin_shutdown();
        let forwarded = child.is_alive() && self.forward(child, signal);
        self.reporter.signal_received(signal, forwarded);
        let trigger = ExitTrigger::OperatorSignal(signal);
        if let Settlement::Decided(code) = self.state.settle(&trigger) {
            self.reporter.exit_decided(&trigger, code);
        }
        // Later signal kinds are still forwarded but never extend the grace window.
        deadlines
            .exit_at
            .get_or_insert_with(|| Instant::now() + self.timings.grace);
    }

    fn on_child_exit(&mut self, exit: ChildExit) -> Option<i32> {
        let trigger = ExitTrigger::ChildExit(exit);
        match self.state.settle(&trigger) {
            Settlement::Decided(code) => {
                self.reporter.exit_decided(&trigger, code);
                Some(self.finish(code))
            }
            Settlement::AlreadySettled(code) => {
                debug!(
                    target: SUPERVISOR_TARGET,
                    code,
                    "dev server exited after the exit code was decided"
                );
                None
            }
        }
    }

    fn on_shutdown_request(&mut self, child: &dyn ChildHandle, deadlines: &mut Deadlines) {
        if self.state.decided().is_some() || !self.state.begin_shutdown() {
            return;
        }
        self.reporter.shutdown_requested();
        if child.is_alive() && self.forward(child, TerminationSignal::Terminate) {
            deadlines.escalate_at = Some(Instant::now() + self.timings.escalation);
        }
    }

    fn forward(&self, child: &dyn ChildHandle, signal: TerminationSignal) -> bool {
        match child.signal(signal) {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    target: SUPERVISOR_TARGET,
                    pid = child.id(),
                    signal = %signal,
                    error = %error,
                    "failed to signal dev server"
                );
                false
            }
        }
    }

    fn escalate(&self, child: &dyn ChildHandle) {
        if !child.is_alive() {
            return;
        }
        self.reporter.escalated(child.id());
        if let Err(error) = child.force_kill() {
            warn!(
                target: SUPERVISOR_TARGET,
                pid = child.id(),
                error = %error,
                "failed to force-kill dev server"
            );
        }
    }

    fn conclude(&mut self, trigger: &ExitTrigger) -> i32 {
        let settlement = self.state.settle(trigger);
        if let Settlement::Decided(code) = settlement {
            self.reporter.exit_decided(trigger, code);
        }
        self.finish(settlement.code())
    }

    // The supervisor holds its own sender, so the queue cannot normally
    // disconnect; treat it as an unreadable child status if it does.
    fn abandon(&mut self) -> i32 {
        warn!(target: SUPERVISOR_TARGET, "supervisor event queue closed");
        self.conclude(&ExitTrigger::ChildExit(ChildExit::unknown()))
    }

    fn finish(&mut self, code: i32) -> i32 {
        if let Some(mut readiness) = self.readiness.take() {
            readiness.close();
            self.reporter.readiness_closed();
        }
        code
    }
}
