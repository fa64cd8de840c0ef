//! Layered configuration for the Egret command-line tool.
//!
//! Values are merged by `ortho_config` from, in increasing precedence,
//! built-in defaults, a TOML configuration file (`--config-path` or
//! `EGRET_CONFIG_PATH`), `EGRET_*` environment variables, and command-line
//! flags. Every key is optional; the accessors fall back to the defaults in
//! [`defaults`](crate::default_log_filter).

mod defaults;
mod logging;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_ENGINE_PROGRAM, DEFAULT_LOG_FILTER, default_engine_program, default_log_filter,
    default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "EGRET")]
pub struct Config {
    /// Tracing filter directive, for example `egret_core=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    log_filter: Option<String>,
    /// Output format of diagnostic logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    log_format: Option<LogFormat>,
    /// Analysis engine executable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    engine_program: Option<Utf8PathBuf>,
    /// Extra arguments placed before the request flags on every engine
    /// invocation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    engine_args: Vec<String>,
    /// Seed substring for generated strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_substring: Option<String>,
}

impl Config {
    /// Returns the log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Returns the log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or_else(default_log_format)
    }

    /// Returns the engine executable.
    #[must_use]
    pub fn engine_program(&self) -> &Utf8Path {
        self.engine_program
            .as_deref()
            .unwrap_or_else(|| default_engine_program())
    }

    /// Returns the extra engine arguments.
    #[must_use]
    pub fn engine_args(&self) -> &[String] {
        &self.engine_args
    }

    /// Returns the configured base substring, if any.
    #[must_use]
    pub fn base_substring(&self) -> Option<&str> {
        self.base_substring.as_deref()
    }

    /// Replaces the engine executable and its leading arguments.
    #[must_use]
    pub fn with_engine(mut self, program: impl Into<Utf8PathBuf>, args: Vec<String>) -> Self {
        self.engine_program = Some(program.into());
        self.engine_args = args;
        self
    }

    /// Replaces the log filter expression.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Replaces the base substring handed to the engine.
    #[must_use]
    pub fn with_base_substring(mut self, base_substring: impl Into<String>) -> Self {
        self.base_substring = Some(base_substring.into());
        self
    }
}
