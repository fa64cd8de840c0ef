//! A pattern and the test strings a user has collected for it.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::classify::{Classification, classify};
use crate::pattern::Pattern;

/// Immutable value pairing a pattern source with user test strings.
///
/// Every operation returns a new session; nothing is shared between
/// sessions.
///
/// # Example
///
/// ```
/// use egret_core::TestSession;
///
/// let session = TestSession::new("a+").with_string("aa").with_string("b");
/// assert_eq!(session.strings().count(), 2);
///
/// let retargeted = session.reset_for("b+");
/// assert_eq!(retargeted.strings().count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestSession {
    pattern: String,
    strings: BTreeSet<String>,
}

impl TestSession {
    /// Starts an empty session for `pattern`.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            strings: BTreeSet::new(),
        }
    }

    /// Returns the pattern source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Iterates the collected strings in ascending order.
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }

    /// Returns `true` when `candidate` has been collected.
    #[must_use]
    pub fn contains(&self, candidate: &str) -> bool {
        self.strings.contains(candidate)
    }

    /// Adds a string; adding a string twice has no effect.
    #[must_use]
    pub fn with_string(mut self, candidate: impl Into<String>) -> Self {
        self.strings.insert(candidate.into());
        self
    }

    /// Adds every string from `candidates`.
    #[must_use]
    pub fn with_strings<I>(mut self, candidates: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.strings.extend(candidates.into_iter().map(Into::into));
        self
    }

    /// Removes a string if present.
    #[must_use]
    pub fn without_string(mut self, candidate: &str) -> Self {
        self.strings.remove(candidate);
        self
    }

    /// Targets `pattern`; switching to a different pattern clears the
    /// collected strings.
    #[must_use]
    pub fn reset_for(self, pattern: &str) -> Self {
        if self.pattern == pattern {
            self
        } else {
            Self::new(pattern)
        }
    }

    /// Re-tests every collected string against `pattern`.
    #[must_use]
    pub fn retest(&self, pattern: &Pattern) -> Classification {
        classify(pattern, Vec::<String>::new(), self.strings.iter().cloned())
    }
}
