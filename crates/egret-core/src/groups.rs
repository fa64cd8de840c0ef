//! Capture-group tables for matched strings.
//!
//! The group scheme is discovered once from the first matched string and
//! then applied to every row. Named groups are ordered by where each group
//! is defined in the pattern source, reading left to right, rather than by
//! whatever order the regex engine reports them in.

use serde::Serialize;
use tracing::debug;

use crate::error::CoreError;
use crate::pattern::Pattern;

const GROUPS_TARGET: &str = "egret_core::groups";

/// Label of the leading column holding the matched string.
pub const STRING_COLUMN: &str = "String";

/// Which groups the caller wants tabulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupSelection {
    /// Named groups if any, otherwise positional groups.
    #[default]
    All,
    /// Only named groups; positional-only patterns produce no table.
    NamedOnly,
}

/// How group values are labelled and ordered for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupScheme {
    /// The pattern has no capturing groups.
    None,
    /// Unnamed groups, labelled by zero-based index.
    Positional(usize),
    /// Named groups in source-definition order.
    Named(Vec<String>),
}

impl GroupScheme {
    /// Column labels for the groups, excluding the leading string column.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::Positional(count) => (0..*count).map(|index| index.to_string()).collect(),
            Self::Named(names) => names.clone(),
        }
    }
}

/// One matched string and its group values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRow {
    /// The matched string.
    pub string: String,
    /// Group values in header order; `None` for groups that did not
    /// participate in the match.
    pub values: Vec<Option<String>>,
}

/// A header and one row per matched string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTable {
    header: Vec<String>,
    rows: Vec<GroupRow>,
}

impl GroupTable {
    /// Column labels, starting with [`STRING_COLUMN`].
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Rows in the order the matched strings were supplied.
    #[must_use]
    pub fn rows(&self) -> &[GroupRow] {
        &self.rows
    }

    /// Number of group columns, excluding the string column.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.header.len().saturating_sub(1)
    }
}

/// Result of group extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "table", rename_all = "snake_case")]
pub enum GroupExtraction {
    /// No matched strings were supplied.
    NoMatches,
    /// The pattern has no groups to display (for the requested selection).
    NoCapturingGroups,
    /// The extracted table.
    Table(GroupTable),
}

/// Builds the capture-group table for strings known to match `pattern`.
///
/// # Errors
///
/// Returns [`CoreError::NotAMatch`] when one of `matches` does not fully
/// match the pattern.
///
/// # Example
///
/// ```
/// use egret_core::{GroupExtraction, GroupSelection, Pattern, extract_groups};
///
/// let pattern = Pattern::compile("(?P<b>x)(?P<a>y)")?;
/// let extraction = extract_groups(&pattern, &["xy"], GroupSelection::All)?;
/// let GroupExtraction::Table(table) = extraction else {
///     panic!("expected a group table");
/// };
/// assert_eq!(table.header(), ["String", "b", "a"]);
/// # Ok::<(), egret_core::CoreError>(())
/// ```
pub fn extract_groups<S: AsRef<str>>(
    pattern: &Pattern,
    matches: &[S],
    selection: GroupSelection,
) -> Result<GroupExtraction, CoreError> {
    let Some(first) = matches.first() else {
        return Ok(GroupExtraction::NoMatches);
    };

    let scheme = discover_scheme(pattern, first.as_ref(), selection)?;
    debug!(target: GROUPS_TARGET, ?scheme, "discovered group scheme");
    if scheme == GroupScheme::None {
        return Ok(GroupExtraction::NoCapturingGroups);
    }

    let rows = matches
        .iter()
        .map(|candidate| project_row(pattern, candidate.as_ref(), &scheme))
        .collect::<Result<Vec<_>, _>>()?;

    let mut header = vec![String::from(STRING_COLUMN)];
    header.extend(scheme.labels());
    Ok(GroupExtraction::Table(GroupTable { header, rows }))
}

/// Determines the group scheme from the first matched string.
///
/// # Errors
///
/// Returns [`CoreError::NotAMatch`] when `first` does not fully match.
pub fn discover_scheme(
    pattern: &Pattern,
    first: &str,
    selection: GroupSelection,
) -> Result<GroupScheme, CoreError> {
    let captures = pattern.captures(first).ok_or_else(|| CoreError::NotAMatch {
        candidate: first.to_owned(),
    })?;

    if !captures.named().is_empty() {
        let names = captures.named().iter().map(|(name, _)| name.as_str());
        return Ok(GroupScheme::Named(order_by_definition(pattern.source(), names)));
    }
    if captures.positional().is_empty() || selection == GroupSelection::NamedOnly {
        return Ok(GroupScheme::None);
    }
    Ok(GroupScheme::Positional(captures.positional().len()))
}

/// Orders group names by the offset of their defining construct in
/// `source`.
///
/// Names whose definition cannot be located keep their relative order and
/// sort after the located ones.
#[must_use]
pub fn order_by_definition<'a, I>(source: &str, names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut located: Vec<(usize, usize, &str)> = names
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let offset = definition_offset(source, name).unwrap_or(usize::MAX);
            (offset, index, name)
        })
        .collect();
    located.sort_unstable();
    located
        .into_iter()
        .map(|(_, _, name)| name.to_owned())
        .collect()
}

fn definition_offset(source: &str, name: &str) -> Option<usize> {
    source
        .find(&format!("(?P<{name}>"))
        .or_else(|| source.find(&format!("(?<{name}>")))
}

fn project_row(
    pattern: &Pattern,
    candidate: &str,
    scheme: &GroupScheme,
) -> Result<GroupRow, CoreError> {
    let captures = pattern
        .captures(candidate)
        .ok_or_else(|| CoreError::NotAMatch {
            candidate: candidate.to_owned(),
        })?;

    let values = match scheme {
        GroupScheme::None => Vec::new(),
        GroupScheme::Positional(_) => captures.positional().to_vec(),
        GroupScheme::Named(names) => names
            .iter()
            .map(|name| captures.value_of(name).map(str::to_owned))
            .collect(),
    };
    Ok(GroupRow {
        string: candidate.to_owned(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::classify::classify;

    fn compiled(source: &str) -> Pattern {
        Pattern::compile(source).expect("pattern compiles")
    }

    fn table(extraction: GroupExtraction) -> GroupTable {
        match extraction {
            GroupExtraction::Table(table) => table,
            other => panic!("expected a table, got {other:?}"),
        }
    }

    #[test]
    fn named_groups_follow_source_order() {
        let pattern = compiled("(?P<b>x)(?P<a>y)");
        let result =
            table(extract_groups(&pattern, &["xy"], GroupSelection::All).expect("extract"));
        assert_eq!(result.header(), ["String", "b", "a"]);
        assert_eq!(
            result.rows(),
            [GroupRow {
                string: String::from("xy"),
                values: vec![Some(String::from("x")), Some(String::from("y"))],
            }]
        );
    }

    #[test]
    fn order_ignores_the_name_iteration_order() {
        let ordered =
            order_by_definition("(?P<zed>a)(?P<alpha>b)(?P<mid>c)", ["alpha", "mid", "zed"]);
        assert_eq!(ordered, ["zed", "alpha", "mid"]);
    }

    #[test]
    fn name_prefixes_do_not_collide() {
        let ordered = order_by_definition("(?P<ab>x)(?P<a>y)", ["a", "ab"]);
        assert_eq!(ordered, ["ab", "a"]);
    }

    #[test]
    fn angle_bracket_syntax_is_located() {
        let ordered = order_by_definition("(?<second>x)(?P<first>y)", ["first", "second"]);
        assert_eq!(ordered, ["second", "first"]);
    }

    #[test]
    fn positional_groups_are_labelled_by_index() {
        let pattern = compiled("(a)(b)?");
        let result =
            table(extract_groups(&pattern, &["a", "ab"], GroupSelection::All).expect("extract"));
        assert_eq!(result.header(), ["String", "0", "1"]);
        let values: Vec<_> = result.rows().iter().map(|row| row.values.clone()).collect();
        assert_eq!(
            values,
            [
                vec![Some(String::from("a")), None],
                vec![Some(String::from("a")), Some(String::from("b"))],
            ]
        );
    }

    #[test]
    fn named_only_skips_positional_patterns() {
        let pattern = compiled("(a)");
        let extraction =
            extract_groups(&pattern, &["a"], GroupSelection::NamedOnly).expect("extract");
        assert_eq!(extraction, GroupExtraction::NoCapturingGroups);
    }

    #[test]
    fn named_groups_exclude_unnamed_columns() {
        let pattern = compiled("(x)(?P<tail>y)");
        let result =
            table(extract_groups(&pattern, &["xy"], GroupSelection::All).expect("extract"));
        assert_eq!(result.header(), ["String", "tail"]);
        assert_eq!(result.group_count(), 1);
    }

    #[rstest]
    #[case::no_groups("a+")]
    #[case::non_capturing("(?:a)+")]
    fn patterns_without_groups_signal_no_capturing_groups(#[case] source: &str) {
        let pattern = compiled(source);
        let classification = classify(&pattern, ["a", "aa", "b"], Vec::<String>::new());
        let extraction = extract_groups(&pattern, classification.matches(), GroupSelection::All)
            .expect("extract");
        assert_eq!(extraction, GroupExtraction::NoCapturingGroups);
    }

    #[test]
    fn empty_match_list_is_not_a_group_signal() {
        let pattern = compiled("(a)");
        let extraction =
            extract_groups::<&str>(&pattern, &[], GroupSelection::All).expect("extract");
        assert_eq!(extraction, GroupExtraction::NoMatches);
    }

    #[test]
    fn rows_keep_caller_order() {
        let pattern = compiled("(?P<n>[0-9]+)");
        let extraction =
            extract_groups(&pattern, &["9", "10", "1"], GroupSelection::All).expect("extract");
        let result = table(extraction);
        let strings: Vec<&str> = result.rows().iter().map(|row| row.string.as_str()).collect();
        assert_eq!(strings, ["9", "10", "1"]);
    }

    #[test]
    fn non_matching_string_is_an_error() {
        let pattern = compiled("(a)");
        let error = extract_groups(&pattern, &["a", "b"], GroupSelection::All)
            .expect_err("b does not match");
        assert!(matches!(error, CoreError::NotAMatch { ref candidate } if candidate == "b"));
    }
}
