//! Composition of the dev-server child environment.

use std::collections::BTreeMap;

use devstart_config::EnvSnapshot;

/// Environment handed to the child process, by variable name.
pub type EnvironmentMap = BTreeMap<String, String>;

/// Variable that always carries the resolved port.
pub const PORT_VAR: &str = "PORT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OverrideRule {
    /// Any non-empty user value wins.
    NonEmpty,
    /// Whitespace-only values fall back to the default as well.
    NonBlank,
}

impl OverrideRule {
    fn accepts(self, value: &str) -> bool {
        match self {
            Self::NonEmpty => !value.is_empty(),
            Self::NonBlank => !value.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CiDefault {
    name: &'static str,
    value: &'static str,
    rule: OverrideRule,
}

const fn ci_default(name: &'static str, value: &'static str) -> CiDefault {
    CiDefault {
        name,
        value,
        rule: OverrideRule::NonEmpty,
    }
}

const CI_DEFAULTS: [CiDefault; 8] = [
    ci_default("CI", "true"),
    ci_default("BROWSER", "none"),
    ci_default("HOST", "0.0.0.0"),
    ci_default("CHOKIDAR_USEPOLLING", "false"),
    ci_default("WATCHPACK_POLLING", "false"),
    ci_default("GENERATE_SOURCEMAP", "false"),
    CiDefault {
        name: "NODE_OPTIONS",
        value: "--max-old-space-size=1024",
        rule: OverrideRule::NonBlank,
    },
    ci_default("FAST_REFRESH", "false"),
];

/// Builds the child environment from `base` and the resolved port.
///
/// Every variable in `base` is carried over. CI-safe defaults are layered
/// underneath: a user value replaces a default only when it is non-empty.
/// `PORT` is always the resolved port, whatever the user supplied.
#[must_use]
pub fn compose_environment(base: &EnvSnapshot, resolved_port: u16) -> EnvironmentMap {
    let mut composed: EnvironmentMap = base.clone().into_map();
    for default in CI_DEFAULTS {
        let keep_user_value = base
            .get(default.name)
            .is_some_and(|value| default.rule.accepts(value));
        if !keep_user_value {
            composed.insert(default.name.to_owned(), default.value.to_owned());
        }
    }
    composed.insert(PORT_VAR.to_owned(), resolved_port.to_string());
    composed
}
