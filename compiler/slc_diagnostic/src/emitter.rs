//! Terminal diagnostic emission with optional ANSI color.

use std::io::{self, IsTerminal, Write};

use crate::{Diagnostic, Severity};

/// Writes diagnostics to a terminal-like sink.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, colors: bool) -> Self {
        TerminalEmitter { writer, colors }
    }

    pub fn emit(&mut self, diagnostic: &Diagnostic) {
        if self.colors {
            let header = match diagnostic.severity {
                Severity::Error => {
                    format!("\x1b[1;31merror ({}):\x1b[0m", diagnostic.location_text())
                }
                Severity::InternalError => "\x1b[1;31minternal compiler error:\x1b[0m".to_string(),
            };
            let _ = writeln!(self.writer, "{header} {}", diagnostic.message);
        } else {
            let _ = writeln!(self.writer, "{diagnostic}");
        }
    }
}

impl TerminalEmitter<io::Stderr> {
    /// Emitter for stderr with auto-detected color support.
    pub fn stderr() -> Self {
        let colors = io::stderr().is_terminal();
        TerminalEmitter {
            writer: io::stderr(),
            colors,
        }
    }
}
