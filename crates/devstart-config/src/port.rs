use thiserror::Error;

use crate::defaults::DEFAULT_PREFERRED_PORT;
use crate::env::EnvSnapshot;

/// Variables consulted, in order, for the port the dev server should prefer.
pub const PREFERRED_PORT_VARS: [&str; 2] = ["REACT_APP_PORT", "PORT"];

/// A port variable held something other than a non-zero TCP port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{variable}={value:?} is not a valid TCP port")]
pub struct PortParseError {
    /// Variable the value was read from.
    pub variable: String,
    /// Offending value.
    pub value: String,
}

/// Parses a port read from `variable`, rejecting zero and out-of-range values.
pub fn parse_port(variable: &str, value: &str) -> Result<u16, PortParseError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(PortParseError {
            variable: variable.to_owned(),
            value: value.to_owned(),
        }),
    }
}

/// Resolves the preferred dev-server port from `REACT_APP_PORT`, then
/// `PORT`, falling back to [`DEFAULT_PREFERRED_PORT`].
///
/// Empty values are skipped. A non-empty value that does not parse is an
/// error rather than a silent skip so the operator learns about the typo.
pub fn preferred_port(env: &EnvSnapshot) -> Result<u16, PortParseError> {
    env.first_non_empty(&PREFERRED_PORT_VARS)
        .map_or(Ok(DEFAULT_PREFERRED_PORT), |(variable, value)| {
            parse_port(variable, value)
        })
}
