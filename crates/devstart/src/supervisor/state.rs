//! Guard flags that keep the exit decision single-assignment.

use std::collections::HashSet;

use super::policy::{ExitTrigger, normalise};
use super::signals::TerminationSignal;

/// Coarse lifecycle phase derived from the guard flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The child is running and no shutdown has begun.
    Running,
    /// A shutdown sequence is in progress.
    ShuttingDown,
    /// The exit code has been decided; terminal.
    Normalised(i32),
}

/// Outcome of offering a trigger to [`SupervisorState::settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// This trigger decided the exit code.
    Decided(i32),
    /// An earlier trigger already decided; the stored code is unchanged.
    AlreadySettled(i32),
}

impl Settlement {
    /// The exit code in force after the call.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Decided(code) | Self::AlreadySettled(code) => code,
        }
    }
}

/// Mutable supervisor record. Created once per run and never reset.
#[derive(Debug, Default)]
pub struct SupervisorState {
    shutting_down: bool,
    normalised: Option<i32>,
    handled_signals: HashSet<TerminationSignal>,
}

impl SupervisorState {
    /// Fresh state in the running phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match (self.normalised, self.shutting_down) {
            (Some(code), _) => Phase::Normalised(code),
            (None, true) => Phase::ShuttingDown,
            (None, false) => Phase::Running,
        }
    }

    /// The decided exit code, if any.
    #[must_use]
    pub const fn decided(&self) -> Option<i32> {
        self.normalised
    }

    /// Marks the shutdown as started. Returns false when it already was.
    pub const fn begin_shutdown(&mut self) -> bool {
        let first = !self.shutting_down;
        self.shutting_down = true;
        first
    }

    /// Claims the one allowed handling of `signal`. Returns false for a
    /// repeated delivery of the same signal kind.
    pub fn claim_signal(&mut self, signal: TerminationSignal) -> bool {
        self.handled_signals.insert(signal)
    }

    /// Decides the exit code from `trigger` unless a decision exists.
    pub fn settle(&mut self, trigger: &ExitTrigger) -> Settlement {
        if let Some(code) = self.normalised {
            return Settlement::AlreadySettled(code);
        }
        let code = normalise(trigger);
        self.normalised = Some(code);
        Settlement::Decided(code)
    }
}
