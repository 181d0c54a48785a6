use std::process::ExitCode;

use devstart::initialise_telemetry;
use devstart_config::{EnvSnapshot, LogSettings};

fn main() -> ExitCode {
    let env = EnvSnapshot::capture();
    let installed = LogSettings::from_env(&env)
        .map_err(|error| error.to_string())
        .and_then(|settings| initialise_telemetry(&settings).map_err(|error| error.to_string()));
    if let Err(error) = installed {
        eprintln!("devstart-healthcheck: {error}");
        return ExitCode::FAILURE;
    }
    devstart_healthcheck::run(&env)
}
