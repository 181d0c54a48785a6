use std::ffi::OsString;

use clap::Parser;

use crate::defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_PROGRAM, DEFAULT_TOOL, DISABLED_HEALTH_PORT, START_ARGUMENT,
};
use crate::logging::{LOG_FILTER_VAR, LOG_FORMAT_VAR, LogFormat, LogSettings};

/// Resolved supervisor configuration.
///
/// Values are layered: command-line flags override environment variables,
/// which override the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "devstart",
    version,
    about = "Runs the UI dev server non-interactively with CI-safe exit codes"
)]
pub struct Config {
    /// Log filter expression understood by `tracing_subscriber::EnvFilter`.
    #[arg(long, env = LOG_FILTER_VAR, default_value = DEFAULT_LOG_FILTER)]
    log_filter: String,
    /// Log output format (`json` or `compact`).
    #[arg(long, env = LOG_FORMAT_VAR, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
    /// Port for the readiness responder; zero disables it.
    #[arg(long, env = "HEALTH_PORT", default_value_t = DISABLED_HEALTH_PORT)]
    health_port: u16,
    /// Launcher executable used to run the dev-server tool.
    #[arg(long, env = "DEVSTART_PROGRAM", default_value = DEFAULT_PROGRAM)]
    program: String,
    /// Dev-server tool started through the launcher.
    #[arg(long, env = "DEVSTART_TOOL", default_value = DEFAULT_TOOL)]
    tool: String,
}

impl Config {
    /// Loads configuration from the process arguments and environment.
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Loads configuration from an explicit argument list; the first item
    /// is the binary name.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// Log filter and format as one value for telemetry.
    #[must_use]
    pub fn log_settings(&self) -> LogSettings {
        LogSettings::new(self.log_filter.clone(), self.log_format)
    }

    /// Readiness responder port, when enabled.
    #[must_use]
    pub const fn health_port(&self) -> Option<u16> {
        if self.health_port > DISABLED_HEALTH_PORT {
            Some(self.health_port)
        } else {
            None
        }
    }

    /// Launcher executable.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the launcher: the tool followed by `start`.
    #[must_use]
    pub fn launch_args(&self) -> Vec<String> {
        vec![self.tool.clone(), START_ARGUMENT.to_owned()]
    }
}
