//! Minimal HTTP responder announcing that the supervisor is alive.
//!
//! The responder answers every request, whatever the method or path, with a
//! static JSON status that carries the resolved dev-server port. It says
//! nothing about whether the dev server itself is serving yet.

mod errors;
mod listener;
mod responder;

pub use self::errors::ReadinessError;
pub use self::listener::{ReadinessHandle, ReadinessServer};

const READINESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::readiness");
