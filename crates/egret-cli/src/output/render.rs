//! Plain-text rendering of reports.

use egret_core::{
    AlertReport, Classification, GenerateReport, GroupExtraction, GroupSelection, GroupTable,
    RunOutcome, Verdict, display_string,
};

use super::ReportHeader;

/// Narrowest padding applied to matched strings in group listings.
const MIN_STRING_WIDTH: usize = 7;

/// Notice shown when groups were requested but the pattern has none.
pub(crate) const NO_GROUPS_NOTICE: &str = "Regex does not have any capturing groups";

const STATS_RULE: &str = "--------------------------------------";

/// Marker for a group that took no part in the match.
const UNSET_GROUP: &str = "-";

pub(crate) fn render_header(header: &ReportHeader<'_>) -> String {
    let mut rendered = format!("Regex: {}\n\n", header.pattern);
    if let Some(description) = header.description {
        rendered.push_str(&format!("Description: {description}\n\n"));
    }
    rendered
}

pub(crate) fn render_check(
    header: &ReportHeader<'_>,
    outcome: &RunOutcome<AlertReport>,
) -> String {
    let mut rendered = render_header(header);
    match outcome {
        RunOutcome::Failed { status } => push_line(&mut rendered, status),
        RunOutcome::Completed(report) => {
            for line in report.display_lines() {
                push_line(&mut rendered, &line);
            }
        }
    }
    rendered
}

pub(crate) fn render_generate(
    header: &ReportHeader<'_>,
    outcome: &RunOutcome<GenerateReport>,
    stats: bool,
    groups: Option<GroupSelection>,
) -> String {
    let report = match outcome {
        RunOutcome::Failed { status } => {
            let mut rendered = format!("\n{}", render_header(header));
            push_line(&mut rendered, status);
            return rendered;
        }
        RunOutcome::Completed(report) => report,
    };

    let mut rendered = String::new();
    if stats {
        rendered.push_str(&render_stats(&report.classification));
    }
    rendered.push('\n');
    rendered.push_str(&render_header(header));
    for line in report.alerts.display_lines() {
        push_line(&mut rendered, &line);
    }
    if groups == Some(GroupSelection::All)
        && report.groups == Some(GroupExtraction::NoCapturingGroups)
    {
        push_line(&mut rendered, NO_GROUPS_NOTICE);
    }

    rendered.push_str("Matches:\n");
    match &report.groups {
        Some(GroupExtraction::Table(table)) => rendered.push_str(&render_group_rows(table)),
        _ => {
            for candidate in report.classification.matches() {
                push_line(&mut rendered, display_string(candidate));
            }
        }
    }

    rendered.push_str("\nNon-matches:\n");
    for candidate in report.classification.non_matches() {
        push_line(&mut rendered, display_string(candidate));
    }
    rendered
}

pub(crate) fn render_stats(classification: &Classification) -> String {
    let stats = classification.stats();
    let mut rendered = String::new();
    push_line(&mut rendered, STATS_RULE);
    push_line(&mut rendered, &format!("{:<30}| {}", "Matches", stats.matches));
    push_line(&mut rendered, &format!("{:<30}| {}", "Non-matches", stats.non_matches));
    rendered
}

/// One line per matched string: the string padded to a common width, then
/// its group values.
pub(crate) fn render_group_rows(table: &GroupTable) -> String {
    let width = table
        .rows()
        .iter()
        .map(|row| row.string.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_STRING_WIDTH);
    let labels = table.header().iter().skip(1);

    let mut rendered = String::new();
    for row in table.rows() {
        let values = labels
            .clone()
            .zip(&row.values)
            .map(|(label, value)| match value {
                Some(text) => format!("{label}={text:?}"),
                None => format!("{label}={UNSET_GROUP}"),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let shown = display_string(&row.string);
        push_line(&mut rendered, &format!("{shown:<width$}  {values}"));
    }
    rendered
}

pub(crate) fn render_verdict(verdict: Verdict) -> String {
    format!("{verdict}\n")
}

fn push_line(rendered: &mut String, line: &str) {
    rendered.push_str(line);
    rendered.push('\n');
}
