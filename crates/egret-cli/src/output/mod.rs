//! Rendering of run results as plain text or JSON.
//!
//! The human form mirrors the classic report layout: a `Regex:` header, the
//! validated alert lines, then the matching and non-matching strings. The
//! JSON form wraps the same data in a single document.

mod render;

use egret_core::{
    AlertReport, ClassificationStats, GenerateReport, GroupSelection, RunOutcome, StringVerdict,
};
use serde::Serialize;

use crate::cli::ResolvedOutputFormat;
use crate::errors::AppError;

#[cfg(test)]
pub(crate) use render::NO_GROUPS_NOTICE;

/// Pattern and description shown at the top of every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct ReportHeader<'a> {
    #[serde(rename = "regex")]
    pub(crate) pattern: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<&'a str>,
}

/// A finished run ready to be rendered.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Report<'a> {
    Check(&'a RunOutcome<AlertReport>),
    Generate {
        outcome: &'a RunOutcome<GenerateReport>,
        stats: bool,
        groups: Option<GroupSelection>,
    },
    Test(&'a RunOutcome<StringVerdict>),
}

impl Report<'_> {
    /// Returns `true` when the run stopped on a fatal status.
    pub(crate) const fn is_failed(&self) -> bool {
        match self {
            Self::Check(outcome) => outcome.is_failed(),
            Self::Generate { outcome, .. } => outcome.is_failed(),
            Self::Test(outcome) => outcome.is_failed(),
        }
    }
}

#[derive(Serialize)]
struct JsonDocument<'a, T: Serialize> {
    #[serde(flatten)]
    header: ReportHeader<'a>,
    result: &'a T,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<ClassificationStats>,
}

impl<'a, T: Serialize> JsonDocument<'a, T> {
    const fn new(header: ReportHeader<'a>, result: &'a T) -> Self {
        Self {
            header,
            result,
            stats: None,
        }
    }
}

/// Renders `report` in the requested format.
pub(crate) fn render_report(
    header: ReportHeader<'_>,
    report: Report<'_>,
    format: ResolvedOutputFormat,
) -> Result<String, AppError> {
    match format {
        ResolvedOutputFormat::Human => Ok(render_human(&header, report)),
        ResolvedOutputFormat::Json => render_json(header, report),
    }
}

fn render_human(header: &ReportHeader<'_>, report: Report<'_>) -> String {
    match report {
        Report::Check(outcome) => render::render_check(header, outcome),
        Report::Generate {
            outcome,
            stats,
            groups,
        } => render::render_generate(header, outcome, stats, groups),
        Report::Test(outcome) => match outcome {
            RunOutcome::Failed { status } => format!("{}{status}\n", render::render_header(header)),
            RunOutcome::Completed(tested) => render::render_verdict(tested.verdict),
        },
    }
}

fn render_json(header: ReportHeader<'_>, report: Report<'_>) -> Result<String, AppError> {
    let rendered = match report {
        Report::Check(outcome) => serde_json::to_string_pretty(&JsonDocument::new(header, outcome)),
        Report::Generate { outcome, stats, .. } => {
            let mut document = JsonDocument::new(header, outcome);
            if stats && let RunOutcome::Completed(generated) = outcome {
                document.stats = Some(generated.classification.stats());
            }
            serde_json::to_string_pretty(&document)
        }
        Report::Test(outcome) => serde_json::to_string_pretty(&JsonDocument::new(header, outcome)),
    }
    .map_err(AppError::SerialiseReport)?;
    Ok(format!("{rendered}\n"))
}
