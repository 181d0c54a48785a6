//! Wiring from configuration to a supervised dev-server run.

use std::sync::Arc;

use devstart_config::{Config, DEFAULT_PREFERRED_PORT, EnvSnapshot, preferred_port};
use tracing::warn;

use crate::environment::compose_environment;
use crate::ports::find_free_port;
use crate::readiness::{ReadinessHandle, ReadinessServer};
use crate::reporter::{LifecycleReporter, StructuredLifecycleReporter};

use super::SUPERVISOR_TARGET;
use super::child::{LaunchSpec, Launcher, OsLauncher};
use super::runtime::{Supervisor, SupervisorParts};
use super::signals::{SignalSource, SystemSignalSource};

/// Runs the dev server against the real process environment, OS signals
/// and child processes. Returns the supervisor's exit code.
#[must_use]
pub fn run_supervisor(config: &Config) -> i32 {
    run_supervisor_with(
        config,
        &EnvSnapshot::capture(),
        OsLauncher::new(),
        SystemSignalSource::new(),
        Arc::new(StructuredLifecycleReporter::new()),
    )
}

/// Runs the dev server with injected collaborators.
#[must_use]
pub fn run_supervisor_with<L, S>(
    config: &Config,
    env: &EnvSnapshot,
    launcher: L,
    signals: S,
    reporter: Arc<dyn LifecycleReporter>,
) -> i32
where
    L: Launcher,
    S: SignalSource,
{
    let preferred = preferred_port(env).unwrap_or_else(|error| {
        warn!(
            target: SUPERVISOR_TARGET,
            error = %error,
            fallback = DEFAULT_PREFERRED_PORT,
            "ignoring invalid port variable"
        );
        DEFAULT_PREFERRED_PORT
    });
    let resolved = find_free_port(preferred);
    reporter.port_resolved(preferred, resolved);

    let readiness = config
        .health_port()
        .and_then(|port| start_readiness(port, resolved, reporter.as_ref()));

    let spec = LaunchSpec {
        program: config.program().to_owned(),
        args: config.launch_args(),
        env: compose_environment(env, resolved),
    };

    Supervisor::new(SupervisorParts {
        launcher,
        signals,
        reporter,
        spec,
        readiness,
    })
    .run()
}

fn start_readiness(
    health_port: u16,
    dev_server_port: u16,
    reporter: &dyn LifecycleReporter,
) -> Option<ReadinessHandle> {
    let started = ReadinessServer::bind(health_port)
        .and_then(|server| server.start(dev_server_port));
    match started {
        Ok(handle) => {
            reporter.readiness_started(handle.local_addr());
            Some(handle)
        }
        Err(error) => {
            reporter.readiness_failed(&error);
            None
        }
    }
}
