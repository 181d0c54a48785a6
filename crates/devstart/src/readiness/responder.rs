//! Request handling for the readiness responder.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use super::READINESS_TARGET;

const MAX_HEAD_BYTES: usize = 8 * 1024;
const READ_TIMEOUT: Duration = Duration::from_millis(500);
const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// JSON payload served for every request.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(super) struct StatusBody {
    status: &'static str,
    message: &'static str,
    port: String,
}

impl StatusBody {
    pub(super) fn starting(dev_server_port: u16) -> Self {
        Self {
            status: "ok",
            message: "frontend dev server starting",
            port: dev_server_port.to_string(),
        }
    }

    pub(super) fn render(&self) -> String {
        // Serialising a struct of strings cannot fail; keep the empty
        // object as a fallback rather than panicking.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

/// Drains the request head, then writes the fixed status response.
pub(super) fn respond(mut stream: TcpStream, body: &str) {
    drain_request_head(&mut stream);
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    if let Err(error) = stream
        .write_all(response.as_bytes())
        .and_then(|()| stream.flush())
    {
        debug!(
            target: READINESS_TARGET,
            error = %error,
            "failed to write readiness response"
        );
    }
}

fn drain_request_head(stream: &mut TcpStream) {
    if stream.set_read_timeout(Some(READ_TIMEOUT)).is_err() {
        return;
    }
    let mut head: Vec<u8> = Vec::with_capacity(512);
    let mut chunk = [0_u8; 512];
    while head.len() < MAX_HEAD_BYTES {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(read) => {
                head.extend(chunk.iter().take(read));
                if head
                    .windows(HEAD_TERMINATOR.len())
                    .any(|window| window == HEAD_TERMINATOR)
                {
                    return;
                }
            }
        }
    }
}
