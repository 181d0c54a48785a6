//! Sequential discovery of a free TCP port for the dev server.

use std::net::{Ipv4Addr, TcpListener};

use tracing::{debug, warn};

const PORTS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::ports");

/// Number of consecutive ports examined, starting at the preferred one.
pub const PORT_SCAN_WINDOW: u16 = 32;

/// Answers whether a single port can currently be bound.
pub trait PortProbe {
    /// Returns true when `port` is free. Any failure counts as occupied.
    fn is_free(&self, port: u16) -> bool;
}

/// Probe that binds a throwaway listener on all interfaces.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpPortProbe;

impl PortProbe for TcpPortProbe {
    fn is_free(&self, port: u16) -> bool {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)) {
            // The listener is released as soon as it goes out of scope.
            Ok(_listener) => true,
            Err(error) => {
                debug!(
                    target: PORTS_TARGET,
                    port,
                    error = %error,
                    "port unavailable"
                );
                false
            }
        }
    }
}

/// Finds the lowest free port in `[preferred, preferred + 32)`.
///
/// Returns `preferred` unchanged when the whole window is occupied; the dev
/// server then reports the collision itself.
#[must_use]
pub fn find_free_port(preferred: u16) -> u16 {
    find_free_port_with(&TcpPortProbe, preferred)
}

/// Scans with an explicit probe, one port at a time in ascending order.
///
/// The window is truncated at `u16::MAX` rather than wrapping.
pub fn find_free_port_with<P>(probe: &P, preferred: u16) -> u16
where
    P: PortProbe + ?Sized,
{
    let found = (0..PORT_SCAN_WINDOW)
        .map_while(|offset| preferred.checked_add(offset))
        .find(|candidate| probe.is_free(*candidate));
    if let Some(port) = found {
        debug!(target: PORTS_TARGET, preferred, port, "free port found");
        port
    } else {
        warn!(
            target: PORTS_TARGET,
            preferred,
            window = PORT_SCAN_WINDOW,
            "no free port in scan window; keeping preferred port"
        );
        preferred
    }
}
