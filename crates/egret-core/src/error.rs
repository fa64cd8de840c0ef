//! Error types for pattern compilation and run orchestration.
//!
//! Fatal conditions (a pattern that does not compile, an engine that reports
//! failure) surface as [`CoreError`]. Recoverable, per-line conditions found
//! while interpreting a report never become errors; they are resolved inside
//! the interpreter as annotations or dropped lines.

use thiserror::Error;

use crate::engine::EngineError;

/// Prefix prepended to compiler diagnostics in run-level status lines.
pub const COMPILER_ERROR_PREFIX: &str = "ERROR (compiler error): ";

/// A regular expression failed to compile.
///
/// The message is the compiler's own diagnostic text, carried verbatim so it
/// can be shown to the user.
///
/// # Example
///
/// ```
/// use egret_core::Pattern;
///
/// let error = Pattern::compile("(").expect_err("unbalanced group");
/// assert!(error.to_string().starts_with("Regular expression did not compile"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Regular expression did not compile: {message}")]
pub struct PatternError {
    message: String,
}

impl PatternError {
    /// Creates an error from a compiler diagnostic.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the compiler diagnostic text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Formats the error as the single status line reported for a run.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!("{COMPILER_ERROR_PREFIX}{self}")
    }
}

/// Errors produced by the core pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// The supplied pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The analysis engine could not be driven.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A string handed to the group extractor does not fully match.
    #[error("string '{candidate}' does not fully match the pattern")]
    NotAMatch {
        /// The offending string.
        candidate: String,
    },
}
