//! Mapping of termination triggers onto the supervisor's own exit code.

use super::child::ChildExit;
use super::signals::TerminationSignal;

/// Exit code used when the dev server never started.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 1;

/// Exit codes that encode a signal death and are treated as intentional
/// stops: 130 (`SIGINT`), 137 (`SIGKILL`/OOM), 141 (`SIGPIPE`) and
/// 143 (`SIGTERM`).
pub const NORMALISED_EXIT_CODES: [i32; 4] = [130, 137, 141, 143];

/// What ended (or is ending) the supervised run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitTrigger {
    /// The operator or orchestrator signalled the supervisor.
    OperatorSignal(TerminationSignal),
    /// The child reached its terminal state on its own.
    ChildExit(ChildExit),
    /// The child could not be started.
    SpawnFailure,
}

/// Decides the supervisor's exit code for `trigger`.
///
/// Any signal death wins over the numeric code when both are reported.
#[must_use]
pub fn normalise(trigger: &ExitTrigger) -> i32 {
    match trigger {
        ExitTrigger::OperatorSignal(_) => 0,
        ExitTrigger::SpawnFailure => SPAWN_FAILURE_EXIT_CODE,
        ExitTrigger::ChildExit(exit) => normalise_child_exit(*exit),
    }
}

fn normalise_child_exit(exit: ChildExit) -> i32 {
    if exit.signal.is_some() {
        return 0;
    }
    match exit.code {
        None => 0,
        Some(code) if code < 0 || NORMALISED_EXIT_CODES.contains(&code) => 0,
        Some(code) => code,
    }
}
