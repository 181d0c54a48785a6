//! Scripted stand-in for the OS process launcher.

use std::io;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use crate::supervisor::{
    ChildExit, ChildHandle, EventSender, LaunchSpec, Launcher, SpawnError, TerminationSignal,
};

pub const FAKE_PID: u32 = 4242;
const SIGKILL: i32 = 9;

/// How the fake child behaves once launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildScript {
    /// The child terminates straight away.
    ExitImmediately(ChildExit),
    /// The child dies from whichever signal it is sent first.
    RunUntilSignalled,
    /// The child exits with the given status when it receives any signal.
    ExitOnSignal(ChildExit),
    /// The child ignores cooperative signals and only dies when killed.
    IgnoreSignals,
    /// The executable cannot be spawned.
    FailToSpawn,
}

/// Everything the fake launcher observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FakeLog {
    pub launches: Vec<LaunchSpec>,
    pub signals: Vec<TerminationSignal>,
    pub force_kills: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SharedLog(Arc<Mutex<FakeLog>>);

impl SharedLog {
    fn with<R>(&self, update: impl FnOnce(&mut FakeLog) -> R) -> R {
        let mut log = self.0.lock().expect("fake launcher log poisoned");
        update(&mut log)
    }

    pub fn snapshot(&self) -> FakeLog {
        self.with(|log| log.clone())
    }
}

#[derive(Debug)]
pub struct FakeLauncher {
    script: ChildScript,
    log: SharedLog,
}

impl FakeLauncher {
    pub fn new(script: ChildScript) -> Self {
        Self {
            script,
            log: SharedLog::default(),
        }
    }

    pub fn log(&self) -> SharedLog {
        self.log.clone()
    }
}

impl Launcher for FakeLauncher {
    fn launch(
        &self,
        spec: &LaunchSpec,
        events: EventSender,
    ) -> Result<Box<dyn ChildHandle>, SpawnError> {
        self.log.with(|log| log.launches.push(spec.clone()));
        let child = FakeChild {
            script: self.script,
            alive: Arc::new(AtomicBool::new(true)),
            events,
            log: self.log.clone(),
        };
        match self.script {
            ChildScript::FailToSpawn => {
                return Err(SpawnError::Spawn {
                    program: spec.program.clone(),
                    source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
                });
            }
            ChildScript::ExitImmediately(exit) => child.terminate(exit),
            ChildScript::RunUntilSignalled
            | ChildScript::ExitOnSignal(_)
            | ChildScript::IgnoreSignals => {}
        }
        Ok(Box::new(child))
    }
}

struct FakeChild {
    script: ChildScript,
    alive: Arc<AtomicBool>,
    events: EventSender,
    log: SharedLog,
}

impl FakeChild {
    fn terminate(&self, exit: ChildExit) {
        if self.alive.swap(false, Ordering::SeqCst) {
            self.events.child_exited(exit);
        }
    }
}

impl ChildHandle for FakeChild {
    fn id(&self) -> u32 {
        FAKE_PID
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn signal(&self, signal: TerminationSignal) -> io::Result<()> {
        self.log.with(|log| log.signals.push(signal));
        match self.script {
            ChildScript::RunUntilSignalled => {
                self.terminate(ChildExit::signalled(signal.as_raw()));
            }
            ChildScript::ExitOnSignal(exit) => self.terminate(exit),
            ChildScript::ExitImmediately(_)
            | ChildScript::IgnoreSignals
            | ChildScript::FailToSpawn => {}
        }
        Ok(())
    }

    fn force_kill(&self) -> io::Result<()> {
        self.log.with(|log| log.force_kills += 1);
        self.terminate(ChildExit::signalled(SIGKILL));
        Ok(())
    }
}
