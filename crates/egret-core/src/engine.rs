//! The seam between the core and the external analysis engine.
//!
//! The engine that discovers vulnerable sub-patterns and synthesises test
//! strings is a black box. Given an [`EngineRequest`] it returns raw text
//! lines, which [`EngineOutput::parse`] splits into the error, alert, and
//! candidate-string sections described by the engine's line protocol.
//!
//! Implementations of [`AnalysisEngine`] live outside this crate; the CLI
//! provides one that drives an engine executable. Tests substitute doubles.

use std::sync::Arc;

use thiserror::Error;

/// Base substring the engine uses when synthesising strings by default.
pub const DEFAULT_BASE_SUBSTRING: &str = "evil";

/// Sentinel line separating alert text from candidate strings.
pub const BEGIN_SENTINEL: &str = "BEGIN";

/// Status line reported when the engine has no warnings.
pub const SUCCESS_STATUS: &str = "SUCCESS";

/// Prefix of a status line reporting engine failure.
pub const ERROR_PREFIX: &str = "ERROR";

/// Which analysis the engine should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    /// Generate candidate strings, emitting alerts before a `BEGIN` sentinel.
    Generate,
    /// Only check the pattern and emit alert text.
    Check,
}

/// A request handed to the analysis engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRequest {
    /// Source text of the pattern under analysis.
    pub pattern: String,
    /// Substring the engine uses as the seed of generated strings.
    pub base_substring: String,
    /// Requested analysis.
    pub mode: EngineMode,
    /// Asks the engine to emit debugging output.
    pub debug: bool,
    /// Asks the engine to emit statistics.
    pub stats: bool,
}

impl EngineRequest {
    /// Creates a request with the default base substring and no extra
    /// output.
    #[must_use]
    pub fn new(pattern: impl Into<String>, mode: EngineMode) -> Self {
        Self {
            pattern: pattern.into(),
            base_substring: String::from(DEFAULT_BASE_SUBSTRING),
            mode,
            debug: false,
            stats: false,
        }
    }

    /// Replaces the base substring.
    #[must_use]
    pub fn with_base_substring(mut self, base_substring: impl Into<String>) -> Self {
        self.base_substring = base_substring.into();
        self
    }

    /// Sets the debug and statistics flags.
    #[must_use]
    pub const fn with_diagnostics(mut self, debug: bool, stats: bool) -> Self {
        self.debug = debug;
        self.stats = stats;
        self
    }
}

/// Runs the external analysis.
///
/// # Example
///
/// ```
/// use egret_core::{AnalysisEngine, EngineError, EngineRequest};
///
/// struct Canned;
///
/// impl AnalysisEngine for Canned {
///     fn run(&self, _request: &EngineRequest) -> Result<Vec<String>, EngineError> {
///         Ok(vec![String::from("BEGIN"), String::from("evil")])
///     }
/// }
/// ```
pub trait AnalysisEngine {
    /// Executes the engine and returns its raw output lines.
    ///
    /// An entry may itself contain embedded newlines; callers split them.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine cannot be driven at all.
    /// An engine that runs but reports failure does so through an `ERROR`
    /// status line, not through this error.
    fn run(&self, request: &EngineRequest) -> Result<Vec<String>, EngineError>;
}

/// Failures driving the analysis engine.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The engine produced no lines at all.
    #[error("analysis engine produced no output")]
    EmptyOutput,

    /// The engine process could not be started.
    #[error("failed to start analysis engine '{program}': {source}")]
    Spawn {
        /// Program that was launched.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Communication with the engine failed.
    #[error("I/O error reading analysis engine output: {0}")]
    Io(#[source] Arc<std::io::Error>),

    /// The engine process exited unsuccessfully.
    #[error("analysis engine '{program}' exited with status {status}")]
    NonZeroExit {
        /// Program that was launched.
        program: String,
        /// Exit status, or `-1` when terminated by a signal.
        status: i32,
    },

    /// The engine wrote bytes that are not valid UTF-8.
    #[error("analysis engine output is not valid UTF-8")]
    InvalidUtf8,
}

/// Engine output split into its protocol sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutput {
    /// The engine reported an error; the line is the whole result.
    Failed(String),
    /// The engine succeeded.
    Completed {
        /// Leading alert text, one entry per engine line.
        alerts: Vec<String>,
        /// Candidate strings following the alert text.
        candidates: Vec<String>,
    },
}

impl EngineOutput {
    /// Splits raw engine lines into error, alerts, and candidates.
    ///
    /// When a `BEGIN` sentinel is present, the lines before it are alerts
    /// and the lines after it are candidates. Otherwise the first line is a
    /// status line: `SUCCESS` carries no alerts, anything else is split on
    /// newlines into alert lines.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyOutput`] when `lines` is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use egret_core::EngineOutput;
    ///
    /// let lines = vec!["alert".to_owned(), "BEGIN".to_owned(), "evil".to_owned()];
    /// let output = EngineOutput::parse(lines)?;
    /// assert_eq!(
    ///     output,
    ///     EngineOutput::Completed {
    ///         alerts: vec!["alert".to_owned()],
    ///         candidates: vec!["evil".to_owned()],
    ///     }
    /// );
    /// # Ok::<(), egret_core::EngineError>(())
    /// ```
    pub fn parse(lines: Vec<String>) -> Result<Self, EngineError> {
        let mut remaining = lines.into_iter();
        let first = remaining.next().ok_or(EngineError::EmptyOutput)?;
        if first.starts_with(ERROR_PREFIX) {
            return Ok(Self::Failed(first));
        }

        let rest: Vec<String> = remaining.collect();
        if first == BEGIN_SENTINEL {
            return Ok(Self::Completed {
                alerts: Vec::new(),
                candidates: rest,
            });
        }

        if let Some(position) = rest.iter().position(|line| line == BEGIN_SENTINEL) {
            let mut alerts = Vec::with_capacity(position + 1);
            alerts.push(first);
            let mut tail = rest.into_iter();
            alerts.extend(tail.by_ref().take(position));
            // Skip the sentinel itself.
            tail.next();
            return Ok(Self::Completed {
                alerts,
                candidates: tail.collect(),
            });
        }

        let alerts = if first == SUCCESS_STATUS {
            Vec::new()
        } else {
            first
                .trim_end()
                .split('\n')
                .map(str::to_owned)
                .collect()
        };
        Ok(Self::Completed {
            alerts,
            candidates: rest,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_owned()).collect()
    }

    #[test]
    fn error_status_wins_over_everything_else() {
        let output = EngineOutput::parse(owned(&["ERROR (x): broken", "BEGIN", "evil"]))
            .expect("non-empty output");
        assert_eq!(output, EngineOutput::Failed(String::from("ERROR (x): broken")));
    }

    #[test]
    fn leading_sentinel_means_no_alerts() {
        let output = EngineOutput::parse(owned(&["BEGIN", "", "evil"])).expect("non-empty output");
        assert_eq!(
            output,
            EngineOutput::Completed {
                alerts: Vec::new(),
                candidates: owned(&["", "evil"]),
            }
        );
    }

    #[test]
    fn alerts_before_a_later_sentinel_are_kept_whole() {
        let output = EngineOutput::parse(owned(&["first\nsecond", "third", "BEGIN", "evil"]))
            .expect("non-empty output");
        assert_eq!(
            output,
            EngineOutput::Completed {
                alerts: owned(&["first\nsecond", "third"]),
                candidates: owned(&["evil"]),
            }
        );
    }

    #[rstest]
    #[case::success("SUCCESS", &[])]
    #[case::warnings("Warning one\nWarning two\n", &["Warning one", "Warning two"])]
    fn status_line_protocol(#[case] status: &str, #[case] expected: &[&str]) {
        let output = EngineOutput::parse(owned(&[status, "evil"])).expect("non-empty output");
        assert_eq!(
            output,
            EngineOutput::Completed {
                alerts: owned(expected),
                candidates: owned(&["evil"]),
            }
        );
    }

    #[test]
    fn empty_output_is_an_error() {
        let error = EngineOutput::parse(Vec::new()).expect_err("no lines");
        assert!(matches!(error, EngineError::EmptyOutput));
    }

    #[test]
    fn request_builder_sets_every_field() {
        let request = EngineRequest::new("a+", EngineMode::Check)
            .with_base_substring("seed")
            .with_diagnostics(true, false);
        assert_eq!(request.pattern, "a+");
        assert_eq!(request.base_substring, "seed");
        assert_eq!(request.mode, EngineMode::Check);
        assert!(request.debug);
        assert!(!request.stats);
    }
}
