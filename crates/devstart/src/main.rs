use std::process::ExitCode;

use devstart::{exit_code, initialise_telemetry, run_supervisor};
use devstart_config::Config;

fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => error.exit(),
    };
    if let Err(error) = initialise_telemetry(&config.log_settings()) {
        eprintln!("devstart: {error}");
        return ExitCode::FAILURE;
    }
    exit_code(run_supervisor(&config))
}
