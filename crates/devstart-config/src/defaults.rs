/// Port requested from the scanner when neither `REACT_APP_PORT` nor `PORT` is set.
pub const DEFAULT_PREFERRED_PORT: u16 = 3000;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Launcher executable used to run the dev-server tool.
pub const DEFAULT_PROGRAM: &str = if cfg!(windows) { "npx.cmd" } else { "npx" };

/// Dev-server tool handed to the launcher.
pub const DEFAULT_TOOL: &str = "react-scripts";

/// Final argument passed to the dev-server tool.
pub const START_ARGUMENT: &str = "start";

/// Health port value that leaves the readiness server disabled.
pub const DISABLED_HEALTH_PORT: u16 = 0;

