//! Partitioning of candidate strings into matches and non-matches.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::pattern::Pattern;

const CLASSIFY_TARGET: &str = "egret_core::classify";

/// Token displayed in place of the empty string.
pub const EMPTY_PLACEHOLDER: &str = "<empty>";

/// Returns the display form of a candidate string.
///
/// # Example
///
/// ```
/// use egret_core::display_string;
///
/// assert_eq!(display_string(""), "<empty>");
/// assert_eq!(display_string("evil"), "evil");
/// ```
#[must_use]
pub fn display_string(candidate: &str) -> &str {
    if candidate.is_empty() {
        EMPTY_PLACEHOLDER
    } else {
        candidate
    }
}

/// Sorted, disjoint matches and non-matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    matches: Vec<String>,
    non_matches: Vec<String>,
}

impl Classification {
    /// Strings that fully match, in ascending order.
    #[must_use]
    pub fn matches(&self) -> &[String] {
        &self.matches
    }

    /// Strings that do not fully match, in ascending order.
    #[must_use]
    pub fn non_matches(&self) -> &[String] {
        &self.non_matches
    }

    /// Counts of both partitions.
    #[must_use]
    pub fn stats(&self) -> ClassificationStats {
        ClassificationStats {
            matches: self.matches.len(),
            non_matches: self.non_matches.len(),
        }
    }
}

/// Partition sizes, reported by the statistics mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationStats {
    /// Number of matching strings.
    pub matches: usize,
    /// Number of non-matching strings.
    pub non_matches: usize,
}

/// Classifies the union of engine candidates and user strings.
///
/// Duplicates across or within the two sources collapse to a single entry.
///
/// # Example
///
/// ```
/// use egret_core::{Pattern, classify};
///
/// let pattern = Pattern::compile("a*")?;
/// let result = classify(&pattern, ["", "b"], ["aa", "b"]);
/// assert_eq!(result.matches(), ["", "aa"]);
/// assert_eq!(result.non_matches(), ["b"]);
/// # Ok::<(), egret_core::PatternError>(())
/// ```
#[must_use]
pub fn classify<C, U>(pattern: &Pattern, candidates: C, user_strings: U) -> Classification
where
    C: IntoIterator,
    C::Item: Into<String>,
    U: IntoIterator,
    U::Item: Into<String>,
{
    let mut union: BTreeSet<String> = candidates.into_iter().map(Into::into).collect();
    union.extend(user_strings.into_iter().map(Into::into));

    let (matches, non_matches): (Vec<String>, Vec<String>) = union
        .into_iter()
        .partition(|candidate| pattern.full_match(candidate));

    debug!(
        target: CLASSIFY_TARGET,
        matches = matches.len(),
        non_matches = non_matches.len(),
        "classified candidate strings"
    );
    Classification {
        matches,
        non_matches,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rstest::rstest;

    use super::*;

    fn compiled(source: &str) -> Pattern {
        Pattern::compile(source).expect("pattern compiles")
    }

    #[test]
    fn empty_string_matches_star_and_sorts_first() {
        let pattern = compiled("a*");
        let result = classify(&pattern, ["aaa", ""], Vec::<String>::new());
        assert_eq!(result.matches(), ["", "aaa"]);
        let first = result.matches().first().expect("a match");
        assert_eq!(display_string(first), EMPTY_PLACEHOLDER);
    }

    #[test]
    fn union_collapses_duplicates_across_sources() {
        let pattern = compiled("evil");
        let result = classify(&pattern, ["evil", "good", "evil"], ["evil", "bad"]);
        assert_eq!(result.matches(), ["evil"]);
        assert_eq!(result.non_matches(), ["bad", "good"]);
    }

    #[rstest]
    #[case::anchored_alternation("a|ab", "ab", true)]
    #[case::substring_only("b", "abc", false)]
    #[case::backreference(r"(a)\1", "aa", true)]
    #[case::lookahead(r"(?=a)\w+", "abc", true)]
    fn classification_uses_full_match(
        #[case] source: &str,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        let pattern = compiled(source);
        let result = classify(&pattern, [candidate], Vec::<String>::new());
        assert_eq!(result.matches().contains(&candidate.to_owned()), expected);
        assert_eq!(result.non_matches().contains(&candidate.to_owned()), !expected);
    }

    #[test]
    fn partitions_cover_the_union_exactly() {
        let pattern = compiled("[a-c]+");
        let engine = ["abc", "xyz", "", "cab"];
        let user = ["zzz", "abc", "b"];
        let result = classify(&pattern, engine, user);

        let expected: BTreeSet<&str> = engine.iter().chain(user.iter()).copied().collect();
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for item in result.matches().iter().chain(result.non_matches()) {
            assert!(seen.insert(item.as_str()), "{item:?} appears twice");
        }
        assert_eq!(seen, expected);
        assert!(result.matches().iter().all(|s| pattern.full_match(s)));
        assert!(result.non_matches().iter().all(|s| !pattern.full_match(s)));
        assert!(result.matches().is_sorted());
        assert!(result.non_matches().is_sorted());
    }

    #[test]
    fn stats_count_partitions() {
        let pattern = compiled("x");
        let result = classify(&pattern, ["x", "y", "z"], Vec::<String>::new());
        assert_eq!(
            result.stats(),
            ClassificationStats {
                matches: 1,
                non_matches: 2
            }
        );
    }
}
