//! End-to-end runs: compile, analyse, interpret, classify.
//!
//! [`check`] validates the engine's alert text for a pattern; [`generate`]
//! additionally classifies the engine's candidate strings together with any
//! user-supplied strings and, when asked, tabulates capture groups.
//!
//! A run that cannot proceed (the pattern does not compile, or the engine
//! reports an `ERROR` status) ends in [`RunOutcome::Failed`] carrying the one
//! status line to show. Failing to drive the engine at all is an error.

use serde::Serialize;
use tracing::{debug, info};

use crate::classify::{Classification, classify};
use crate::engine::{
    AnalysisEngine, DEFAULT_BASE_SUBSTRING, ERROR_PREFIX, EngineMode, EngineOutput, EngineRequest,
};
use crate::error::{CoreError, PatternError};
use crate::groups::{GroupExtraction, GroupSelection, extract_groups};
use crate::pattern::{Pattern, Verdict};
use crate::report::{AlertReport, InterpreterOptions, ReportInterpreter};

const PIPELINE_TARGET: &str = "egret_core::pipeline";

/// Knobs shared by both kinds of run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Keep and annotate report lines that fail validation.
    pub warn: bool,
    /// Seed substring for generated strings.
    pub base_substring: String,
    /// Ask the engine for debugging output.
    pub debug: bool,
    /// Ask the engine for statistics.
    pub stats: bool,
    /// Tabulate capture groups of the matching strings.
    pub groups: Option<GroupSelection>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            warn: false,
            base_substring: String::from(DEFAULT_BASE_SUBSTRING),
            debug: false,
            stats: false,
            groups: None,
        }
    }
}

impl RunOptions {
    fn request(&self, pattern: &str, mode: EngineMode) -> EngineRequest {
        EngineRequest::new(pattern, mode)
            .with_base_substring(self.base_substring.as_str())
            .with_diagnostics(self.debug, self.stats)
    }

    const fn interpreter_options(&self) -> InterpreterOptions {
        InterpreterOptions::with_warn(self.warn)
    }
}

/// Result of a run that was driven to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome<T> {
    /// The run stopped early; `status` is the only line to report.
    Failed {
        /// The status line.
        status: String,
    },
    /// The run completed.
    Completed(T),
}

impl<T> RunOutcome<T> {
    /// Returns `true` for [`RunOutcome::Failed`].
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Everything a generate run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateReport {
    /// Interpreted alert text.
    pub alerts: AlertReport,
    /// Matching and non-matching strings.
    pub classification: Classification,
    /// Capture-group table, present when groups were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<GroupExtraction>,
}

/// Checks `source` and returns its interpreted alert report.
///
/// # Errors
///
/// Returns [`CoreError::Engine`] when the engine cannot be driven.
pub fn check<E>(
    engine: &E,
    source: &str,
    options: &RunOptions,
) -> Result<RunOutcome<AlertReport>, CoreError>
where
    E: AnalysisEngine + ?Sized,
{
    debug!(target: PIPELINE_TARGET, pattern = source, "checking pattern");
    let pattern = match Pattern::compile(source) {
        Ok(pattern) => pattern,
        Err(err) => return Ok(compile_failure(&err)),
    };

    let lines = engine.run(&options.request(source, EngineMode::Check))?;
    if let Some(status) = lines.first().filter(|line| line.starts_with(ERROR_PREFIX)) {
        info!(target: PIPELINE_TARGET, status = %status, "engine reported an error");
        return Ok(RunOutcome::Failed {
            status: status.clone(),
        });
    }

    let interpreter = ReportInterpreter::new(&pattern, options.interpreter_options());
    Ok(RunOutcome::Completed(interpreter.interpret(lines.as_slice())))
}

/// Generates strings for `source` and classifies them together with
/// `user_strings`.
///
/// # Errors
///
/// Returns [`CoreError::Engine`] when the engine cannot be driven or
/// produces no output, and [`CoreError::NotAMatch`] if group extraction
/// meets a string that no longer matches.
pub fn generate<E, U>(
    engine: &E,
    source: &str,
    options: &RunOptions,
    user_strings: U,
) -> Result<RunOutcome<GenerateReport>, CoreError>
where
    E: AnalysisEngine + ?Sized,
    U: IntoIterator,
    U::Item: Into<String>,
{
    debug!(target: PIPELINE_TARGET, pattern = source, "generating strings");
    let pattern = match Pattern::compile(source) {
        Ok(pattern) => pattern,
        Err(err) => return Ok(compile_failure(&err)),
    };

    let lines = engine.run(&options.request(source, EngineMode::Generate))?;
    let (alert_lines, candidates) = match EngineOutput::parse(lines)? {
        EngineOutput::Failed(status) => {
            info!(target: PIPELINE_TARGET, status = %status, "engine reported an error");
            return Ok(RunOutcome::Failed { status });
        }
        EngineOutput::Completed { alerts, candidates } => (alerts, candidates),
    };

    let interpreter = ReportInterpreter::new(&pattern, options.interpreter_options());
    let alerts = interpreter.interpret(alert_lines.as_slice());
    let classification = classify(&pattern, candidates, user_strings);
    let groups = options
        .groups
        .map(|selection| extract_groups(&pattern, classification.matches(), selection))
        .transpose()?;

    info!(
        target: PIPELINE_TARGET,
        matches = classification.matches().len(),
        non_matches = classification.non_matches().len(),
        "generate run completed"
    );
    Ok(RunOutcome::Completed(GenerateReport {
        alerts,
        classification,
        groups,
    }))
}

/// The verdict for one user-supplied string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringVerdict {
    /// The tested string.
    pub candidate: String,
    /// Whether the whole string matches.
    pub verdict: Verdict,
}

/// Tests a single string against `source` without consulting the engine.
#[must_use]
pub fn test_string(source: &str, candidate: &str) -> RunOutcome<StringVerdict> {
    match Pattern::compile(source) {
        Ok(pattern) => RunOutcome::Completed(StringVerdict {
            candidate: candidate.to_owned(),
            verdict: pattern.verdict(candidate),
        }),
        Err(err) => compile_failure(&err),
    }
}

fn compile_failure<T>(err: &PatternError) -> RunOutcome<T> {
    let status = err.status_line();
    info!(target: PIPELINE_TARGET, status = %status, "pattern did not compile");
    RunOutcome::Failed { status }
}
