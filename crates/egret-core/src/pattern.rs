//! Compiled regular expressions with full-string match semantics.
//!
//! A [`Pattern`] is compiled once and then shared read-only by the report
//! interpreter, the match classifier, and the group extractor. Matching is
//! always a *full* match: the whole candidate must be consumed, not merely a
//! substring of it.
//!
//! Patterns are compiled with `fancy-regex`, whose backtracking engine
//! understands the backreferences and look-around assertions that the
//! analysed patterns commonly use.

use std::fmt;

use fancy_regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PatternError;

const PATTERN_TARGET: &str = "egret_core::pattern";

/// An immutable compiled regular expression and its source text.
///
/// # Example
///
/// ```
/// use egret_core::Pattern;
///
/// let pattern = Pattern::compile("a+b")?;
/// assert!(pattern.full_match("aab"));
/// assert!(!pattern.full_match("aabc"));
/// # Ok::<(), egret_core::PatternError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    anchored: Regex,
}

impl Pattern {
    /// Compiles `source` into a pattern.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] carrying the compiler diagnostic when the
    /// source is not a valid regular expression.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(source).map_err(|err| PatternError::new(err.to_string()))?;
        let anchored = compile_anchored(source)?;
        Ok(Self {
            source: source.to_owned(),
            regex,
            anchored,
        })
    }

    /// Returns the original pattern source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns `true` when `candidate` matches the pattern in its entirety.
    ///
    /// A backtracking limit hit while matching is logged and treated as a
    /// failed match.
    #[must_use]
    pub fn full_match(&self, candidate: &str) -> bool {
        match self.anchored.is_match(candidate) {
            Ok(matched) => matched,
            Err(err) => {
                warn!(
                    target: PATTERN_TARGET,
                    pattern = %self.source,
                    candidate,
                    error = %err,
                    "matching aborted; treating candidate as a non-match"
                );
                false
            }
        }
    }

    /// Returns the capture values of a full match, or `None` when
    /// `candidate` does not fully match.
    #[must_use]
    pub fn captures(&self, candidate: &str) -> Option<CaptureSet> {
        let captures = match self.anchored.captures(candidate) {
            Ok(found) => found?,
            Err(err) => {
                warn!(
                    target: PATTERN_TARGET,
                    pattern = %self.source,
                    candidate,
                    error = %err,
                    "capture extraction aborted"
                );
                return None;
            }
        };

        let positional = (1..self.anchored.captures_len())
            .map(|index| captures.get(index).map(|m| m.as_str().to_owned()))
            .collect();
        let named = self
            .capture_names()
            .into_iter()
            .map(|name| {
                let value = captures.name(&name).map(|m| m.as_str().to_owned());
                (name, value)
            })
            .collect();
        Some(CaptureSet { positional, named })
    }

    /// Returns the names of named groups, in group-index order.
    #[must_use]
    pub fn capture_names(&self) -> Vec<String> {
        self.regex
            .capture_names()
            .flatten()
            .map(str::to_owned)
            .collect()
    }

    /// Returns the number of capturing groups, excluding the implicit
    /// whole-match group.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }

    /// Tests a single string and reports the verdict.
    #[must_use]
    pub fn verdict(&self, candidate: &str) -> Verdict {
        if self.full_match(candidate) {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }
}

/// Compiles the pattern wrapped so that it must span the whole input.
///
/// The wrapper group is non-capturing, so group numbering is unchanged. A
/// trailing newline is tried when the plain wrapper fails: under the
/// verbose flag a trailing comment would otherwise swallow the closing
/// parenthesis.
fn compile_anchored(source: &str) -> Result<Regex, PatternError> {
    Regex::new(&format!(r"\A(?:{source})\z"))
        .or_else(|_| Regex::new(&format!("\\A(?:{source}\n)\\z")))
        .map_err(|err| PatternError::new(err.to_string()))
}

/// Checks that `source` compiles, discarding the compiled form.
///
/// # Errors
///
/// Returns the compiler diagnostic when compilation fails.
pub fn check_compiles(source: &str) -> Result<(), PatternError> {
    Regex::new(source)
        .map(drop)
        .map_err(|err| PatternError::new(err.to_string()))
}

/// Group values captured by a successful full match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaptureSet {
    positional: Vec<Option<String>>,
    named: Vec<(String, Option<String>)>,
}

impl CaptureSet {
    /// Values of every capturing group in index order; `None` marks a group
    /// that did not participate in the match.
    #[must_use]
    pub fn positional(&self) -> &[Option<String>] {
        &self.positional
    }

    /// Named group values in group-index order.
    #[must_use]
    pub fn named(&self) -> &[(String, Option<String>)] {
        &self.named
    }

    /// Looks up the value of a named group.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.named
            .iter()
            .find(|(candidate, _)| candidate == name)
            .and_then(|(_, value)| value.as_deref())
    }
}

/// Outcome of testing one string against a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// The whole string matches.
    Accepted,
    /// The string does not match in full.
    Rejected,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("ACCEPTED"),
            Self::Rejected => f.write_str("REJECTED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn compiled(source: &str) -> Pattern {
        Pattern::compile(source).expect("pattern compiles")
    }

    #[rstest]
    #[case::exact("abc", "abc", true)]
    #[case::prefix_only("abc", "abcd", false)]
    #[case::alternation_needs_whole_input("a|ab", "ab", true)]
    #[case::empty_star("x*", "", true)]
    #[case::backreference(r"(\w)\1", "zz", true)]
    #[case::lookbehind(r"(?<=a)b|ab", "ab", true)]
    fn full_match_consumes_the_whole_candidate(
        #[case] source: &str,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(compiled(source).full_match(candidate), expected);
    }

    #[test]
    fn compile_error_carries_the_compiler_message() {
        let error = Pattern::compile("a{2,1}(").expect_err("invalid pattern");
        assert!(!error.message().is_empty());
        assert!(
            error
                .status_line()
                .starts_with("ERROR (compiler error): Regular expression did not compile: ")
        );
    }

    #[test]
    fn captures_report_positional_and_named_values() {
        let pattern = compiled("(?P<head>a)(b)?(?P<tail>c)");
        let captures = pattern.captures("ac").expect("full match");
        assert_eq!(
            captures.positional(),
            [Some(String::from("a")), None, Some(String::from("c"))]
        );
        assert_eq!(captures.value_of("tail"), Some("c"));
        assert_eq!(pattern.capture_names(), ["head", "tail"]);
        assert_eq!(pattern.group_count(), 3);
    }

    #[test]
    fn captures_require_a_full_match() {
        assert!(compiled("(a)").captures("ab").is_none());
    }

    #[rstest]
    #[case::accepted("evil", Verdict::Accepted, "ACCEPTED")]
    #[case::rejected("devil", Verdict::Rejected, "REJECTED")]
    fn verdict_reports_acceptance(
        #[case] candidate: &str,
        #[case] expected: Verdict,
        #[case] shown: &str,
    ) {
        let verdict = compiled("e*vil").verdict(candidate);
        assert_eq!(verdict, expected);
        assert_eq!(verdict.to_string(), shown);
    }

    #[test]
    fn check_compiles_rejects_unbalanced_groups() {
        assert!(check_compiles("(a").is_err());
        assert!(check_compiles("a{1,3}").is_ok());
    }
}
