//! Interpretation of the engine's free-text alert report.
//!
//! The engine embeds example strings and suggested fixes in its alert text.
//! Neither is trusted: examples are re-tested against the pattern and fixes
//! are re-compiled. The [`ReportInterpreter`] scans the report line by line
//! and produces the [`AlertReport`] that is shown to the user.
//!
//! Anchor examples arrive in consecutive pairs and are validated jointly.
//! The pairing state is explicit ([`AnchorState`]) and strictly sequential.
//!
//! Lines that fail validation are dropped by default. In warn mode they are
//! kept and carry an [`Annotation`] instead.

mod line;

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::pattern::{Pattern, check_compiles};

pub use line::{ANCHOR_EXAMPLE_MARKER, DiagnosticLine, EXAMPLE_MARKER, SUGGESTED_FIX_MARKER};

const REPORT_TARGET: &str = "egret_core::report";

/// Options controlling how failed validations are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterpreterOptions {
    /// Keep lines that fail validation and annotate them.
    pub warn: bool,
}

impl InterpreterOptions {
    /// Options with warn mode set as given.
    #[must_use]
    pub const fn with_warn(warn: bool) -> Self {
        Self { warn }
    }
}

/// Inline notice attached to a line that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Annotation {
    /// An embedded example did not fully match the pattern.
    ExampleRejected,
    /// A suggested fix did not compile; carries the compiler message.
    FixDidNotCompile(String),
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExampleRejected => f.write_str("ATTENTION: EXAMPLE STRING NOT ACCEPTED"),
            Self::FixDidNotCompile(message) => {
                write!(f, "ATTENTION: SUGGESTED FIX DID NOT COMPILE: {message}")
            }
        }
    }
}

/// A retained report line and its optional annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotation: Option<Annotation>,
}

impl ReportLine {
    /// A line passed through unchanged.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotation: None,
        }
    }

    /// A line kept together with an annotation.
    #[must_use]
    pub fn annotated(text: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            text: text.into(),
            annotation: Some(annotation),
        }
    }

    /// Returns the original line text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the annotation, if any.
    #[must_use]
    pub const fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }
}

/// The interpreted alert report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlertReport {
    lines: Vec<ReportLine>,
    #[serde(skip)]
    dropped: usize,
}

impl AlertReport {
    /// Returns the retained lines in their original order.
    #[must_use]
    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    /// Returns the number of lines suppressed from the report.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }

    /// Returns `true` when no line was retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Counts retained, annotated, and dropped lines.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            retained: self.lines.len(),
            annotated: self
                .lines
                .iter()
                .filter(|line| line.annotation.is_some())
                .count(),
            dropped: self.dropped,
        }
    }

    /// Flattens the report into display lines; annotations follow the line
    /// they refer to.
    #[must_use]
    pub fn display_lines(&self) -> Vec<String> {
        let mut rendered = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            rendered.push(line.text.clone());
            if let Some(annotation) = &line.annotation {
                rendered.push(annotation.to_string());
            }
        }
        rendered
    }

    fn keep(&mut self, line: ReportLine) {
        self.lines.push(line);
    }

    fn drop_line(&mut self, text: &str, reason: &str) {
        debug!(target: REPORT_TARGET, line = text, reason, "suppressing report line");
        self.dropped += 1;
    }
}

/// Line counts of an interpreted report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Lines kept in the report, annotated or not.
    pub retained: usize,
    /// Kept lines that carry an annotation.
    pub annotated: usize,
    /// Lines suppressed from the report.
    pub dropped: usize,
}

/// Pairing state for anchor examples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnchorState<'a> {
    /// No anchor line is waiting for its partner.
    #[default]
    Idle,
    /// The first anchor line of a pair has been seen.
    Pending {
        /// Text of the pending line.
        text: &'a str,
        /// Whether its example matched.
        matched: bool,
    },
}

/// Validates and filters engine alert text against a compiled pattern.
///
/// # Example
///
/// ```
/// use egret_core::{InterpreterOptions, Pattern, ReportInterpreter};
///
/// let pattern = Pattern::compile("a+")?;
/// let interpreter = ReportInterpreter::new(&pattern, InterpreterOptions::default());
/// let report = interpreter.interpret_lines(["Alert", "...Example: b"]);
/// assert_eq!(report.display_lines(), vec![String::from("Alert")]);
/// # Ok::<(), egret_core::PatternError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReportInterpreter<'p> {
    pattern: &'p Pattern,
    options: InterpreterOptions,
}

impl<'p> ReportInterpreter<'p> {
    /// Creates an interpreter for `pattern`.
    #[must_use]
    pub const fn new(pattern: &'p Pattern, options: InterpreterOptions) -> Self {
        Self { pattern, options }
    }

    /// Interprets engine output entries, each of which may hold several
    /// newline-separated lines.
    ///
    /// Anchor pairing never spans two entries.
    #[must_use]
    pub fn interpret<S: AsRef<str>>(&self, entries: &[S]) -> AlertReport {
        let mut report = AlertReport::default();
        for entry in entries {
            self.scan(entry.as_ref().split('\n'), &mut report);
        }
        self.finish(report)
    }

    /// Interprets a single sequence of lines.
    #[must_use]
    pub fn interpret_lines<'a, I>(&self, lines: I) -> AlertReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut report = AlertReport::default();
        self.scan(lines, &mut report);
        self.finish(report)
    }

    fn finish(&self, report: AlertReport) -> AlertReport {
        let summary = report.summary();
        info!(
            target: REPORT_TARGET,
            retained = summary.retained,
            annotated = summary.annotated,
            dropped = summary.dropped,
            warn = self.options.warn,
            "interpreted alert report"
        );
        report
    }

    fn scan<'a, I>(&self, lines: I, report: &mut AlertReport)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut state = AnchorState::Idle;
        for raw in lines {
            let line = DiagnosticLine::classify(raw);
            if !matches!(line, DiagnosticLine::AnchorExample { .. }) {
                state = abandon_pending(state, report);
            }
            match line {
                DiagnosticLine::AnchorExample { text, payload } => {
                    state = self.pair_anchor(state, text, payload, report);
                }
                DiagnosticLine::Example { text, payload } => {
                    self.check_example(text, payload, report);
                }
                DiagnosticLine::SuggestedFix { text, payload } => {
                    self.check_fix(text, payload, report);
                }
                DiagnosticLine::PlainAlert(text) => report.keep(ReportLine::plain(text)),
            }
        }
        abandon_pending(state, report);
    }

    fn pair_anchor<'a>(
        &self,
        state: AnchorState<'a>,
        text: &'a str,
        payload: &str,
        report: &mut AlertReport,
    ) -> AnchorState<'a> {
        let matched = self.pattern.full_match(payload);
        match state {
            AnchorState::Idle => AnchorState::Pending { text, matched },
            AnchorState::Pending {
                text: first,
                matched: first_matched,
            } => {
                self.flush_pair((first, first_matched), (text, matched), report);
                AnchorState::Idle
            }
        }
    }

    fn check_example(&self, text: &str, payload: &str, report: &mut AlertReport) {
        if self.pattern.full_match(payload) {
            report.keep(ReportLine::plain(text));
        } else if self.options.warn {
            report.keep(ReportLine::annotated(text, Annotation::ExampleRejected));
        } else {
            report.drop_line(text, "example not accepted");
        }
    }

    fn check_fix(&self, text: &str, payload: &str, report: &mut AlertReport) {
        match check_compiles(payload) {
            Ok(()) => report.keep(ReportLine::plain(text)),
            Err(err) if self.options.warn => report.keep(ReportLine::annotated(
                text,
                Annotation::FixDidNotCompile(err.message().to_owned()),
            )),
            Err(_) => report.drop_line(text, "suggested fix did not compile"),
        }
    }

    fn flush_pair(&self, first: (&str, bool), second: (&str, bool), report: &mut AlertReport) {
        let (first_text, first_matched) = first;
        let (second_text, second_matched) = second;
        if first_matched && second_matched {
            report.keep(ReportLine::plain(first_text));
            report.keep(ReportLine::plain(second_text));
            return;
        }

        if !self.options.warn {
            report.drop_line(first_text, "anchor pair not accepted");
            report.drop_line(second_text, "anchor pair not accepted");
            return;
        }

        for (text, matched) in [first, second] {
            if matched {
                report.keep(ReportLine::plain(text));
            } else {
                report.keep(ReportLine::annotated(text, Annotation::ExampleRejected));
            }
        }
    }
}

/// Discards a pending anchor line; an unpaired anchor is never shown, not
/// even in warn mode.
fn abandon_pending<'a>(state: AnchorState<'a>, report: &mut AlertReport) -> AnchorState<'a> {
    if let AnchorState::Pending { text, .. } = state {
        report.drop_line(text, "anchor example without a partner");
    }
    AnchorState::Idle
}
