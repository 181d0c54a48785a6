//! Resolution of the probe target from the environment.

use std::fmt;
use std::time::Duration;

use devstart_config::{DEFAULT_PREFERRED_PORT, EnvSnapshot, PortParseError, parse_port};
use thiserror::Error;

/// Host used when `HOST` is unset or empty.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Host actually contacted when the dev server binds all interfaces.
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// Variables consulted, in order, for the port to probe.
pub const PROBE_PORT_VARS: [&str; 2] = ["PORT", "REACT_APP_PORT"];

/// Variables consulted, in order, for the path to request.
pub const PROBE_PATH_VARS: [&str; 2] = ["REACT_APP_HEALTHCHECK_PATH", "HEALTHCHECK_PATH"];

/// Variable overriding the request timeout in milliseconds.
pub const TIMEOUT_VAR: &str = "HEALTHCHECK_TIMEOUT_MS";

/// Request timeout used when [`TIMEOUT_VAR`] is unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// The probe environment could not be turned into a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    /// A port variable was malformed.
    #[error(transparent)]
    Port(#[from] PortParseError),
    /// The timeout variable was not a positive number of milliseconds.
    #[error("HEALTHCHECK_TIMEOUT_MS={value:?} is not a positive number of milliseconds")]
    Timeout {
        /// Offending value.
        value: String,
    },
}

/// Where and how long to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    host: String,
    port: u16,
    path: String,
    timeout: Duration,
}

impl ProbeTarget {
    /// Reads the target from `env`.
    pub fn from_env(env: &EnvSnapshot) -> Result<Self, TargetError> {
        let host = match env.non_empty("HOST").unwrap_or(DEFAULT_HOST) {
            DEFAULT_HOST => LOOPBACK_HOST.to_owned(),
            other => other.to_owned(),
        };
        let port = env
            .first_non_empty(&PROBE_PORT_VARS)
            .map_or(Ok(DEFAULT_PREFERRED_PORT), |(variable, value)| {
                parse_port(variable, value)
            })?;
        let path = normalise_path(
            env.first_non_empty(&PROBE_PATH_VARS)
                .map_or("/", |(_, value)| value),
        );
        let timeout = env
            .non_empty(TIMEOUT_VAR)
            .map_or(Ok(DEFAULT_TIMEOUT), parse_timeout)?;
        Ok(Self {
            host,
            port,
            path,
            timeout,
        })
    }

    /// Host to contact.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port to contact.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Normalised request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Bound on the whole request.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full request URL.
    #[must_use]
    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') && !self.host.starts_with('[') {
            write!(formatter, "http://[{}]:{}{}", self.host, self.port, self.path)
        } else {
            write!(formatter, "http://{}:{}{}", self.host, self.port, self.path)
        }
    }
}

/// Ensures a single leading slash and collapses runs of slashes.
#[must_use]
pub fn normalise_path(raw: &str) -> String {
    let mut path = String::with_capacity(raw.len() + 1);
    path.push('/');
    for character in raw.chars() {
        if character == '/' && path.ends_with('/') {
            continue;
        }
        path.push(character);
    }
    path
}

fn parse_timeout(value: &str) -> Result<Duration, TargetError> {
    match value.trim().parse::<u64>() {
        Ok(millis) if millis > 0 => Ok(Duration::from_millis(millis)),
        _ => Err(TargetError::Timeout {
            value: value.to_owned(),
        }),
    }
}
