//! Diagnostics for the SLC compiler.
//!
//! A [`Diagnostic`] pairs a severity with a message and the offending
//! node's source location. User errors render as
//! `error (line L column C): message`; nodes without location information
//! render `location unavailable` instead of failing. Internal invariant
//! violations carry their own prefix so they are never mistaken for user
//! errors.

mod emitter;

pub use emitter::TerminalEmitter;

use std::fmt;

use slc_ir::LocationInfo;

/// How serious a diagnostic is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    /// A user error; compilation fails.
    Error,
    /// An invariant violation inside the compiler; compilation fails.
    InternalError,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::InternalError => write!(f, "internal compiler error"),
        }
    }
}

/// A single reportable problem.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<LocationInfo>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, location: Option<LocationInfo>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            location,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::InternalError,
            message: message.into(),
            location: None,
        }
    }

    /// The location clause used in the rendered header.
    pub fn location_text(&self) -> String {
        match &self.location {
            Some(loc) => loc.to_string(),
            None => "location unavailable".to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Error => {
                write!(f, "error ({}): {}", self.location_text(), self.message)
            }
            Severity::InternalError => {
                write!(f, "internal compiler error: {}", self.message)
            }
        }
    }
}
