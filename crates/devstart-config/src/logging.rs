use strum::{Display, EnumString};
use thiserror::Error;

use crate::defaults::DEFAULT_LOG_FILTER;
use crate::env::EnvSnapshot;

/// Variable holding the log filter expression.
pub const LOG_FILTER_VAR: &str = "DEVSTART_LOG_FILTER";

/// Variable holding the log output format.
pub const LOG_FORMAT_VAR: &str = "DEVSTART_LOG_FORMAT";

/// Supported logging output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by CI log collectors.
    Json,
    /// Human-readable single line output, interleaved with the dev server's own logs.
    #[default]
    Compact,
}

/// The log format variable named an unknown format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("DEVSTART_LOG_FORMAT={value:?} is not one of `json` or `compact`")]
pub struct LogFormatError {
    /// Offending value.
    pub value: String,
}

/// Filter and output format used to install telemetry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    filter: String,
    format: LogFormat,
}

impl LogSettings {
    /// Builds settings from an explicit filter and format.
    #[must_use]
    pub const fn new(filter: String, format: LogFormat) -> Self {
        Self { filter, format }
    }

    /// Reads the settings from the logging variables, falling back to the
    /// defaults for unset or empty values.
    ///
    /// Used by binaries that take no command-line flags.
    pub fn from_env(env: &EnvSnapshot) -> Result<Self, LogFormatError> {
        let filter = env
            .non_empty(LOG_FILTER_VAR)
            .unwrap_or(DEFAULT_LOG_FILTER)
            .to_owned();
        let format = env.non_empty(LOG_FORMAT_VAR).map_or_else(
            || Ok(LogFormat::default()),
            |value| {
                value.parse().map_err(|_| LogFormatError {
                    value: value.to_owned(),
                })
            },
        )?;
        Ok(Self { filter, format })
    }

    /// `tracing_subscriber::EnvFilter` expression.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Output format.
    #[must_use]
    pub const fn format(&self) -> LogFormat {
        self.format
    }
}
