//! Source location annotations.

use std::fmt;

/// A source position recorded by the parser.
///
/// `text` is the source fragment the parser saw at this position; it is
/// echoed in conflict diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationInfo {
    pub line: u32,
    pub column: u32,
    pub text: String,
}

impl LocationInfo {
    pub fn new(line: u32, column: u32, text: impl Into<String>) -> Self {
        LocationInfo {
            line,
            column,
            text: text.into(),
        }
    }
}

impl fmt::Display for LocationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}
