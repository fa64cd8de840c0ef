//! Core of the Egret regular-expression checker.
//!
//! Egret hands a pattern to an external analysis engine, which reports
//! suspicious constructs and synthesises strings that probe the pattern's
//! edges. This crate owns everything that happens around that black box:
//!
//! - [`Pattern`] compiles a pattern once and answers full-match queries.
//! - [`ReportInterpreter`] re-validates the examples and suggested fixes
//!   embedded in the engine's alert text.
//! - [`classify`] partitions candidate strings into matches and
//!   non-matches.
//! - [`extract_groups`] tabulates capture groups for the matching strings.
//! - [`pipeline`] strings the steps together behind the [`AnalysisEngine`]
//!   seam.
//!
//! # Example
//!
//! ```
//! use egret_core::{AnalysisEngine, EngineError, EngineRequest, RunOptions, RunOutcome};
//!
//! struct Canned;
//!
//! impl AnalysisEngine for Canned {
//!     fn run(&self, _request: &EngineRequest) -> Result<Vec<String>, EngineError> {
//!         Ok(["BEGIN", "evil", "vil"].map(String::from).to_vec())
//!     }
//! }
//!
//! let outcome = egret_core::generate(&Canned, "e+vil", &RunOptions::default(), ["eevil"])?;
//! let RunOutcome::Completed(report) = outcome else {
//!     panic!("expected a completed run");
//! };
//! assert_eq!(report.classification.matches(), ["eevil", "evil"]);
//! assert_eq!(report.classification.non_matches(), ["vil"]);
//! # Ok::<(), egret_core::CoreError>(())
//! ```

pub mod classify;
pub mod engine;
pub mod error;
pub mod groups;
pub mod pattern;
pub mod pipeline;
pub mod report;
pub mod session;

#[cfg(test)]
mod tests;

pub use self::classify::{
    Classification, ClassificationStats, EMPTY_PLACEHOLDER, classify, display_string,
};
pub use self::engine::{
    AnalysisEngine, BEGIN_SENTINEL, DEFAULT_BASE_SUBSTRING, EngineError, EngineMode,
    EngineOutput, EngineRequest,
};
pub use self::error::{COMPILER_ERROR_PREFIX, CoreError, PatternError};
pub use self::groups::{
    GroupExtraction, GroupRow, GroupScheme, GroupSelection, GroupTable, STRING_COLUMN,
    extract_groups, order_by_definition,
};
pub use self::pattern::{CaptureSet, Pattern, Verdict, check_compiles};
pub use self::pipeline::{
    GenerateReport, RunOptions, RunOutcome, StringVerdict, check, generate, test_string,
};
pub use self::report::{
    AlertReport, AnchorState, Annotation, DiagnosticLine, InterpreterOptions, ReportInterpreter,
    ReportLine, ReportSummary,
};
pub use self::session::TestSession;
