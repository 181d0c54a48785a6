//! The single HTTP request made by the probe.

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use thiserror::Error;

use crate::target::ProbeTarget;

/// User agent announced to the dev server.
pub const USER_AGENT: &str = "frontend-healthcheck/1.0";

/// The request did not produce a status code.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// The request timed out.
    #[error("request to {url} timed out")]
    Timeout {
        /// Requested URL.
        url: String,
    },
    /// The connection failed or the response was unreadable.
    #[error("request to {url} failed: {source}")]
    Request {
        /// Requested URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
}

/// Issues one GET to `target` and returns the response status.
///
/// Redirects are not followed, so a 3xx answer counts as the server
/// responding.
pub fn probe(target: &ProbeTarget) -> Result<u16, ProbeError> {
    let client = Client::builder()
        .timeout(target.timeout())
        .redirect(Policy::none())
        .user_agent(USER_AGENT)
        .build()
        .map_err(ProbeError::Client)?;
    let url = target.url();
    let response = client.get(&url).send().map_err(|source| {
        if source.is_timeout() {
            ProbeError::Timeout { url: url.clone() }
        } else {
            ProbeError::Request {
                url: url.clone(),
                source,
            }
        }
    })?;
    Ok(response.status().as_u16())
}

/// Returns true for statuses in `[200, 500)`.
#[must_use]
pub const fn is_healthy(status: u16) -> bool {
    status >= 200 && status < 500
}
