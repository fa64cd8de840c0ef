use camino::Utf8Path;

use crate::logging::LogFormat;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Engine executable looked up on `PATH` when none is configured.
pub const DEFAULT_ENGINE_PROGRAM: &str = "egret-engine";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format; diagnostics share the terminal with the report,
/// so they stay on one line each.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default analysis engine executable.
#[must_use]
pub fn default_engine_program() -> &'static Utf8Path {
    Utf8Path::new(DEFAULT_ENGINE_PROGRAM)
}
