//! The dev-server child process and the seam used to launch it.

use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::{self, SendError},
};
use std::thread;

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tracing::{info, warn};

use crate::environment::EnvironmentMap;

use super::SUPERVISOR_TARGET;
use super::errors::SpawnError;
use super::events::EventSender;
use super::signals::TerminationSignal;

/// Terminal state reported for the child.
///
/// `code` is absent when the child died from a signal or its status could
/// not be read; `signal` is present only for signal deaths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildExit {
    /// Numeric exit code, when the child exited normally.
    pub code: Option<i32>,
    /// Raw number of the signal that killed the child.
    pub signal: Option<i32>,
}

impl ChildExit {
    /// Normal exit with `code`.
    #[must_use]
    pub const fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    /// Death by the raw signal `signal`.
    #[must_use]
    pub const fn signalled(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }

    /// Neither a code nor a signal is known.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            code: None,
            signal: None,
        }
    }
}

impl From<ExitStatus> for ChildExit {
    fn from(status: ExitStatus) -> Self {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::signalled(signal);
            }
        }
        status.code().map_or_else(Self::unknown, Self::with_code)
    }
}

/// Everything needed to start the dev server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    /// Executable to run.
    pub program: String,
    /// Arguments passed to the executable.
    pub args: Vec<String>,
    /// Complete child environment; nothing else is inherited.
    pub env: EnvironmentMap,
}

/// Control surface over a running child.
pub trait ChildHandle: Send {
    /// Process identifier.
    fn id(&self) -> u32;

    /// Returns false once the child has been reaped.
    fn is_alive(&self) -> bool;

    /// Sends a cooperative termination signal.
    fn signal(&self, signal: TerminationSignal) -> io::Result<()>;

    /// Kills the child unconditionally.
    fn force_kill(&self) -> io::Result<()>;
}

/// Starts children and arranges for their terminal event to be posted.
pub trait Launcher {
    /// Spawns the child described by `spec`.
    ///
    /// Implementations post exactly one [`ChildExit`] through `events` when
    /// the child terminates.
    fn launch(
        &self,
        spec: &LaunchSpec,
        events: EventSender,
    ) -> Result<Box<dyn ChildHandle>, SpawnError>;
}

/// Launches real OS processes with inherited standard streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsLauncher;

impl OsLauncher {
    /// Builds a new launcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Launcher for OsLauncher {
    fn launch(
        &self,
        spec: &LaunchSpec,
        events: EventSender,
    ) -> Result<Box<dyn ChildHandle>, SpawnError> {
        // Waiter first: a failed thread spawn must not leave an unreaped child.
        let (handoff, pending) = mpsc::sync_channel::<Child>(1);
        let alive = Arc::new(AtomicBool::new(true));
        let alive_flag = Arc::clone(&alive);
        thread::Builder::new()
            .name("devstart-child-waiter".to_owned())
            .spawn(move || {
                let Ok(mut child) = pending.recv() else {
                    return;
                };
                let pid = child.id();
                let exit = match child.wait() {
                    Ok(status) => ChildExit::from(status),
                    Err(error) => {
                        warn!(
                            target: SUPERVISOR_TARGET,
                            pid,
                            error = %error,
                            "failed to read dev server exit status"
                        );
                        ChildExit::unknown()
                    }
                };
                alive_flag.store(false, Ordering::SeqCst);
                info!(
                    target: SUPERVISOR_TARGET,
                    pid,
                    code = ?exit.code,
                    signal = ?exit.signal,
                    "dev server exited"
                );
                events.child_exited(exit);
            })
            .map_err(|source| SpawnError::Waiter { source })?;
        let child = Command::new(&spec.program)
            .args(&spec.args)
            .env_clear()
            .envs(&spec.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| SpawnError::Spawn {
                program: spec.program.clone(),
                source,
            })?;
        let pid = child.id();
        handoff
            .send(child)
            .map_err(|SendError(child)| reap_unwatched(child))?;
        Ok(Box::new(OsChild { pid, alive }))
    }
}

fn reap_unwatched(mut child: Child) -> SpawnError {
    let pid = child.id();
    if let Err(error) = child.kill().and_then(|()| child.wait().map(drop)) {
        warn!(
            target: SUPERVISOR_TARGET,
            pid,
            error = %error,
            "failed to reap dev server after losing its waiter"
        );
    }
    SpawnError::Waiter {
        source: io::Error::other("dev server waiter stopped before taking the child"),
    }
}

#[derive(Debug)]
struct OsChild {
    pid: u32,
    alive: Arc<AtomicBool>,
}

impl OsChild {
    fn deliver(&self, signal: Signal) -> io::Result<()> {
        let raw = i32::try_from(self.pid)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
        kill(Pid::from_raw(raw), signal).map_err(io::Error::from)
    }
}

impl ChildHandle for OsChild {
    fn id(&self) -> u32 {
        self.pid
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn signal(&self, signal: TerminationSignal) -> io::Result<()> {
        self.deliver(signal.as_nix())
    }

    fn force_kill(&self) -> io::Result<()> {
        self.deliver(Signal::SIGKILL)
    }
}
