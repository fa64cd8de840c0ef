//! Classification of individual engine diagnostic lines.
//!
//! The engine marks embedded example strings and suggested fixes with
//! literal prefixes followed by a colon-delimited payload. Classifying each
//! line once into a [`DiagnosticLine`] keeps the prefix handling in one
//! place.

/// Prefix of an example that must be validated together with its neighbour.
pub const ANCHOR_EXAMPLE_MARKER: &str = "...String with";

/// Prefix of a standalone example string.
pub const EXAMPLE_MARKER: &str = "...Example";

/// Prefix of a suggested replacement pattern.
pub const SUGGESTED_FIX_MARKER: &str = "...Suggested fix";

/// One line of engine output, tagged by what it carries.
///
/// # Example
///
/// ```
/// use egret_core::DiagnosticLine;
///
/// let line = DiagnosticLine::classify("...Example: abc");
/// assert_eq!(line.payload(), Some("abc"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLine<'a> {
    /// Any line without a recognised marker.
    PlainAlert(&'a str),
    /// An example that is validated in a pair with the next anchor line.
    AnchorExample {
        /// The full line.
        text: &'a str,
        /// The example string embedded in the line.
        payload: &'a str,
    },
    /// A standalone example string.
    Example {
        /// The full line.
        text: &'a str,
        /// The example string embedded in the line.
        payload: &'a str,
    },
    /// A suggested replacement pattern.
    SuggestedFix {
        /// The full line.
        text: &'a str,
        /// The suggested pattern embedded in the line.
        payload: &'a str,
    },
}

impl<'a> DiagnosticLine<'a> {
    /// Classifies a raw line by its marker prefix.
    ///
    /// A marked line without a colon has no payload and is classified as a
    /// plain alert.
    #[must_use]
    pub fn classify(text: &'a str) -> Self {
        let Some(payload) = extract_payload(text) else {
            return Self::PlainAlert(text);
        };
        if text.starts_with(ANCHOR_EXAMPLE_MARKER) {
            Self::AnchorExample { text, payload }
        } else if text.starts_with(EXAMPLE_MARKER) {
            Self::Example { text, payload }
        } else if text.starts_with(SUGGESTED_FIX_MARKER) {
            Self::SuggestedFix { text, payload }
        } else {
            Self::PlainAlert(text)
        }
    }

    /// Returns the full line text.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        match self {
            Self::PlainAlert(text)
            | Self::AnchorExample { text, .. }
            | Self::Example { text, .. }
            | Self::SuggestedFix { text, .. } => *text,
        }
    }

    /// Returns the embedded payload, if the line carries one.
    #[must_use]
    pub const fn payload(&self) -> Option<&'a str> {
        match self {
            Self::PlainAlert(_) => None,
            Self::AnchorExample { payload, .. }
            | Self::Example { payload, .. }
            | Self::SuggestedFix { payload, .. } => Some(*payload),
        }
    }
}

/// Returns the text after the first colon, minus the one separator
/// character the format reserves.
fn extract_payload(text: &str) -> Option<&str> {
    let (_, remainder) = text.split_once(':')?;
    let mut chars = remainder.chars();
    chars.next();
    Some(chars.as_str())
}
