//! Integration tests for the `devstart-healthcheck` binary.
//!
//! Each test runs the probe against a one-shot listener on loopback that
//! answers with a canned status line.

use std::io::{BufRead, BufReader, Write};
use std::net::{Ipv4Addr, TcpListener};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use rstest::rstest;

const PATH_VARS: [&str; 2] = ["REACT_APP_HEALTHCHECK_PATH", "HEALTHCHECK_PATH"];

struct CannedServer {
    port: u16,
    request_line: mpsc::Receiver<String>,
}

fn serve_once(status_line: &'static str) -> CannedServer {
    let listener =
        TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).expect("loopback bind should succeed");
    let port = listener
        .local_addr()
        .expect("listener should have an address")
        .port();
    let (tx, request_line) = mpsc::channel();
    thread::spawn(move || {
        let Ok((stream, _)) = listener.accept() else {
            return;
        };
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        if reader.read_line(&mut line).is_err() {
            return;
        }
        let mut header = String::new();
        while reader.read_line(&mut header).is_ok_and(|read| read > 2) {
            header.clear();
        }
        let mut stream = reader.into_inner();
        let response =
            format!("HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let _ = stream.write_all(response.as_bytes());
        let _ = tx.send(line.trim_end().to_owned());
    });
    CannedServer { port, request_line }
}

fn probe_command(port: u16) -> Command {
    let mut command = cargo_bin_cmd!("devstart-healthcheck");
    command
        .env("HOST", "127.0.0.1")
        .env("PORT", port.to_string())
        .env_remove("REACT_APP_PORT")
        .env_remove("HEALTHCHECK_TIMEOUT_MS")
        .env_remove("DEVSTART_LOG_FILTER")
        .env_remove("DEVSTART_LOG_FORMAT");
    for var in PATH_VARS {
        command.env_remove(var);
    }
    command
}

#[rstest]
#[case::ok("200 OK", true)]
#[case::redirect("302 Found", true)]
#[case::not_found("404 Not Found", true)]
#[case::server_error("500 Internal Server Error", false)]
#[case::unavailable("503 Service Unavailable", false)]
fn status_decides_exit_code(#[case] status_line: &'static str, #[case] healthy: bool) {
    let server = serve_once(status_line);
    let assert = probe_command(server.port).assert();
    if healthy {
        assert.success();
    } else {
        assert.code(1);
    }
}

#[test]
fn requests_normalised_path_with_user_agent_line() {
    let server = serve_once("200 OK");
    probe_command(server.port)
        .env("HEALTHCHECK_PATH", "health//ready")
        .assert()
        .success()
        .stderr(contains("/health/ready"));
    let line = server
        .request_line
        .recv_timeout(Duration::from_secs(5))
        .expect("server should record the request");
    assert_eq!(line, "GET /health/ready HTTP/1.1");
}

#[test]
fn closed_port_fails() {
    let listener =
        TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).expect("loopback bind should succeed");
    let port = listener
        .local_addr()
        .expect("listener should have an address")
        .port();
    drop(listener);

    probe_command(port).assert().code(1);
}

#[test]
fn silent_server_times_out() {
    let listener =
        TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).expect("loopback bind should succeed");
    let port = listener
        .local_addr()
        .expect("listener should have an address")
        .port();

    probe_command(port)
        .env("HEALTHCHECK_TIMEOUT_MS", "200")
        .assert()
        .code(1)
        .stderr(contains("dev server did not answer"));
    drop(listener);
}

#[test]
fn invalid_port_is_a_configuration_failure() {
    let mut command = cargo_bin_cmd!("devstart-healthcheck");
    command.env("PORT", "frontend");
    command
        .assert()
        .code(1)
        .stderr(contains("invalid healthcheck configuration"));
}

#[test]
fn json_log_format_is_honoured() {
    let server = serve_once("404 Not Found");
    probe_command(server.port)
        .env("DEVSTART_LOG_FORMAT", "json")
        .assert()
        .success()
        .stderr(contains("\"status\":404"))
        .stderr(contains("\"timestamp\":\""));
}

#[test]
fn unknown_log_format_fails_before_any_request() {
    let mut command = cargo_bin_cmd!("devstart-healthcheck");
    command.env("DEVSTART_LOG_FORMAT", "yaml");
    command
        .assert()
        .code(1)
        .stderr(contains("DEVSTART_LOG_FORMAT=\"yaml\""));
}
