//! Committed-line consumer: parse, execute, report

use core::fmt::Write;

use super::commands::execute;
use super::editor::CommandSink;
use super::parser::parse_bytes;
use super::ConsoleError;

/// Runs each committed line against the command table.
///
/// Output starts on a fresh line; the editor prints the next prompt
/// afterwards.
pub struct Interpreter<W: Write> {
    out: W,
    executed: u32,
    last_error: Option<ConsoleError>,
}

impl<W: Write> Interpreter<W> {
    pub const fn new(out: W) -> Self {
        Self {
            out,
            executed: 0,
            last_error: None,
        }
    }

    /// Parse and execute one line
    pub fn run(&mut self, line: &[u8]) -> Result<(), ConsoleError> {
        let _ = self.out.write_str("\n");
        let cmd = parse_bytes(line)?;
        execute(&cmd, &mut self.out)
    }

    /// Lines handed over so far
    pub fn executed(&self) -> u32 {
        self.executed
    }

    /// Error of the most recent line, if it failed
    pub fn last_error(&self) -> Option<ConsoleError> {
        self.last_error
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CommandSink for Interpreter<W> {
    fn on_line(&mut self, line: &[u8]) {
        self.executed = self.executed.wrapping_add(1);
        let result = self.run(line);
        if let Err(e) = result {
            let _ = writeln!(self.out, "ERROR: {}", e);
        }
        self.last_error = result.err();
    }
}
