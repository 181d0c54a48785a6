//! One-shot HTTP probe used by CI to confirm the dev server answers.
//!
//! The probe reads its target from the environment (`HOST`, `PORT`,
//! `REACT_APP_PORT` and the healthcheck path variables), issues a single
//! GET and maps the outcome onto an exit code: success for any status
//! below 500, failure for server errors, timeouts and connection errors.

mod probe;
mod target;

use std::process::ExitCode;

use devstart_config::EnvSnapshot;
use tracing::{error, info};

pub use probe::{ProbeError, USER_AGENT, is_healthy, probe};
pub use target::{
    DEFAULT_HOST, DEFAULT_TIMEOUT, LOOPBACK_HOST, PROBE_PATH_VARS, PROBE_PORT_VARS, ProbeTarget,
    TIMEOUT_VAR, TargetError, normalise_path,
};

const HEALTHCHECK_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::probe");

/// Probes the dev server described by `env` and returns the exit code.
#[must_use]
pub fn run(env: &EnvSnapshot) -> ExitCode {
    let target = match ProbeTarget::from_env(env) {
        Ok(target) => target,
        Err(error) => {
            error!(target: HEALTHCHECK_TARGET, error = %error, "invalid healthcheck configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(target: HEALTHCHECK_TARGET, url = %target, "GET");
    info!(
        target: HEALTHCHECK_TARGET,
        "dev-server shutdowns by SIGINT, SIGTERM or SIGHUP, or with codes 130, 137, 141 or 143, are normalised to success by the supervisor"
    );
    match probe(&target) {
        Ok(status) if is_healthy(status) => {
            info!(target: HEALTHCHECK_TARGET, status, ok = true, "dev server answered");
            ExitCode::SUCCESS
        }
        Ok(status) => {
            error!(target: HEALTHCHECK_TARGET, status, ok = false, "unhealthy response code");
            ExitCode::FAILURE
        }
        Err(error) => {
            error!(target: HEALTHCHECK_TARGET, error = %error, "dev server did not answer");
            ExitCode::FAILURE
        }
    }
}
