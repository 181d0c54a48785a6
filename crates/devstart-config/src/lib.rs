//! Configuration surface shared by the `devstart` supervisor and its
//! healthcheck probe.
//!
//! The crate owns three concerns: the layered [`Config`] (flags, then
//! environment, then defaults), an immutable [`EnvSnapshot`] of the process
//! environment that downstream code reads instead of touching `std::env`
//! directly, and resolution of the port the dev server should prefer.

mod config;
mod defaults;
mod env;
mod logging;
mod port;

pub use config::Config;
pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_PREFERRED_PORT, DEFAULT_PROGRAM, DEFAULT_TOOL,
    DISABLED_HEALTH_PORT, START_ARGUMENT,
};
pub use env::EnvSnapshot;
pub use logging::{LOG_FILTER_VAR, LOG_FORMAT_VAR, LogFormat, LogFormatError, LogSettings};
pub use port::{PREFERRED_PORT_VARS, PortParseError, parse_port, preferred_port};
