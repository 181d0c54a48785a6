//! Test doubles for the supervisor's collaborators.

mod launcher;
mod reporter;
mod signals;

use std::sync::Arc;
use std::time::Duration;

pub use launcher::{ChildScript, FakeLauncher, FakeLog};
pub use reporter::{LifecycleEvent, RecordingLifecycleReporter};
pub use signals::ScriptedSignals;

use crate::readiness::ReadinessHandle;
use crate::reporter::LifecycleReporter;
use crate::supervisor::{LaunchSpec, Supervisor, SupervisorParts, SupervisorTimings};

/// Short timers so scenarios finish quickly.
pub const TEST_TIMINGS: SupervisorTimings = SupervisorTimings {
    grace: Duration::from_millis(50),
    escalation: Duration::from_millis(100),
};

/// What a scripted supervisor run produced.
#[derive(Debug)]
pub struct Outcome {
    pub code: i32,
    pub log: FakeLog,
    pub events: Vec<LifecycleEvent>,
}

impl Outcome {
    pub fn count(&self, wanted: &LifecycleEvent) -> usize {
        self.events.iter().filter(|event| *event == wanted).count()
    }
}

pub fn launch_spec() -> LaunchSpec {
    LaunchSpec {
        program: "fake-npx".to_owned(),
        args: vec!["react-scripts".to_owned(), "start".to_owned()],
        env: crate::environment::EnvironmentMap::new(),
    }
}

/// Runs a supervisor over fake collaborators with [`TEST_TIMINGS`].
pub fn run_scripted(
    script: ChildScript,
    signals: ScriptedSignals,
    readiness: Option<ReadinessHandle>,
) -> Outcome {
    let launcher = FakeLauncher::new(script);
    let log = launcher.log();
    let reporter = Arc::new(RecordingLifecycleReporter::default());
    let shared: Arc<dyn LifecycleReporter> = reporter.clone();
    let code = Supervisor::new(SupervisorParts {
        launcher,
        signals,
        reporter: shared,
        spec: launch_spec(),
        readiness,
    })
    .with_timings(TEST_TIMINGS)
    .run();
    Outcome {
        code,
        log: log.snapshot(),
        events: reporter.events(),
    }
}
