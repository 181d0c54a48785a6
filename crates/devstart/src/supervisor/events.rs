//! Events delivered into the supervisor's single flow of control.

use std::sync::mpsc::{self, Receiver, Sender};

use super::child::ChildExit;
use super::signals::TerminationSignal;

/// Something the supervisor loop must react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// The supervisor received an operator termination signal.
    Signal(TerminationSignal),
    /// The child reached its terminal state.
    ChildExited(ChildExit),
    /// An internal component asked for the child to be wound down.
    ShutdownRequested,
}

/// Cloneable producer side of the supervisor's event queue.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<SupervisorEvent>,
}

impl EventSender {
    pub(crate) fn channel() -> (Self, Receiver<SupervisorEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Posts a termination signal. Returns false once the supervisor is gone.
    pub fn signal(&self, signal: TerminationSignal) -> bool {
        self.send(SupervisorEvent::Signal(signal))
    }

    /// Posts the child's terminal event.
    pub fn child_exited(&self, exit: ChildExit) -> bool {
        self.send(SupervisorEvent::ChildExited(exit))
    }

    /// Posts an internal shutdown request.
    pub fn request_shutdown(&self) -> bool {
        self.send(SupervisorEvent::ShutdownRequested)
    }

    fn send(&self, event: SupervisorEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Lets code outside the supervisor ask it to stop the child gracefully.
#[derive(Debug, Clone)]
pub struct ShutdownRequester {
    events: EventSender,
}

impl ShutdownRequester {
    pub(crate) const fn new(events: EventSender) -> Self {
        Self { events }
    }

    /// Requests a graceful shutdown; returns false once the supervisor is gone.
    pub fn request(&self) -> bool {
        self.events.request_shutdown()
    }
}
