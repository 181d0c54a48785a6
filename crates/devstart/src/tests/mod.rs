//! Test suites for the dev-server supervisor.

mod support;
