//! Signal source that replays a fixed list of operator signals.

use std::io;

use crate::supervisor::{EventSender, SignalError, SignalSource, TerminationSignal};

#[derive(Debug, Clone, Default)]
pub struct ScriptedSignals {
    deliveries: Vec<TerminationSignal>,
    fail: bool,
}

impl ScriptedSignals {
    /// Installs successfully and never delivers anything.
    pub fn quiet() -> Self {
        Self::default()
    }

    /// Delivers `deliveries` in order as soon as the listener is installed.
    pub fn delivering(deliveries: impl IntoIterator<Item = TerminationSignal>) -> Self {
        Self {
            deliveries: deliveries.into_iter().collect(),
            fail: false,
        }
    }

    /// Fails to install, as when the OS refuses the handlers.
    pub fn failing() -> Self {
        Self {
            deliveries: Vec::new(),
            fail: true,
        }
    }
}

impl SignalSource for ScriptedSignals {
    fn install(&self, events: EventSender) -> Result<(), SignalError> {
        if self.fail {
            return Err(SignalError::Install {
                source: io::Error::new(io::ErrorKind::PermissionDenied, "handlers refused"),
            });
        }
        for signal in &self.deliveries {
            events.signal(*signal);
        }
        Ok(())
    }
}
