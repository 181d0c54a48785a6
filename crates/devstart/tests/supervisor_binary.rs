//! Integration tests for the `devstart` binary entry point.
//!
//! Drives the real binary against `/bin/sh` standing in for the dev-server
//! tool, so the exit-code policy is checked end to end.

use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::cargo_bin_cmd;
use devstart::supervisor::GRACE_DELAY;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use predicates::str::contains;

const SHUTDOWN_SLACK: Duration = Duration::from_millis(1500);

#[test]
fn missing_program_exits_with_one() {
    let mut command = cargo_bin_cmd!("devstart");
    command.args([
        "--program",
        "/nonexistent/devstart-missing-tool",
        "--health-port",
        "0",
    ]);
    command
        .assert()
        .code(1)
        .stderr(contains("failed to spawn"));
}

#[test]
fn clean_child_exit_succeeds() {
    let mut command = cargo_bin_cmd!("devstart");
    command.args([
        "--program",
        "/bin/sh",
        "--tool",
        "/dev/null",
        "--health-port",
        "0",
    ]);
    command.assert().success();
}

#[test]
fn genuine_child_failure_is_propagated() {
    // `sh -c start` fails with 127 because no `start` command exists.
    let mut command = cargo_bin_cmd!("devstart");
    command
        .args(["--program", "/bin/sh", "--tool=-c", "--health-port", "0"])
        .env("PATH", "/nonexistent");
    command.assert().code(127);
}

#[test]
fn json_logs_carry_lifecycle_events() {
    let mut command = cargo_bin_cmd!("devstart");
    command.args([
        "--program",
        "/nonexistent/devstart-missing-tool",
        "--health-port",
        "0",
        "--log-format",
        "json",
    ]);
    command
        .assert()
        .code(1)
        .stderr(contains("\"event\":\"spawn_failed\""));
}

#[test]
fn invalid_log_format_is_rejected() {
    let mut command = cargo_bin_cmd!("devstart");
    command.args(["--log-format", "yaml"]);
    command.assert().failure().stderr(contains("yaml"));
}

#[test]
fn operator_interrupt_is_forwarded_and_exits_zero() {
    let script = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/trap_int.sh");
    let mut child = Command::new(env!("CARGO_BIN_EXE_devstart"))
        .args(["--program", "/bin/sh", "--tool", script, "--health-port", "0"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("devstart should start");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout should be piped"));

    let mut transcript = String::new();
    while !transcript.contains("child-ready") {
        let read = stdout
            .read_line(&mut transcript)
            .expect("stdout should be readable");
        assert!(read > 0, "dev server ended before it was ready: {transcript}");
    }

    let pid = i32::try_from(child.id()).expect("pid should fit in i32");
    let interrupted_at = Instant::now();
    kill(Pid::from_raw(pid), Signal::SIGINT).expect("SIGINT should be delivered");
    stdout
        .read_to_string(&mut transcript)
        .expect("stdout should drain");
    let mut stderr = Vec::new();
    if let Some(mut pipe) = child.stderr.take() {
        pipe.read_to_end(&mut stderr)
            .expect("stderr should drain");
    }
    let status = child.wait().expect("devstart should be reaped");
    let elapsed = interrupted_at.elapsed();

    Output {
        status,
        stdout: transcript.into_bytes(),
        stderr,
    }
    .assert()
    .success()
    .stdout(contains("child-got-INT"));
    assert!(
        elapsed < GRACE_DELAY + SHUTDOWN_SLACK,
        "shutdown took {elapsed:?}"
    );
}
