//! Command line parser
//!
//! Simple split on whitespace, first token is the command.

use heapless::Vec;

use super::ConsoleError;

/// Maximum number of arguments kept after the command name
pub const MAX_ARGS: usize = 8;

/// Parsed command with up to `MAX_ARGS` arguments
#[derive(Debug, Clone)]
pub struct ParsedCommand<'a> {
    /// The command name (first token)
    pub command: &'a str,
    /// Arguments in order; extra tokens are dropped
    pub args: Vec<&'a str, MAX_ARGS>,
}

impl<'a> ParsedCommand<'a> {
    /// Create empty command
    pub const fn empty() -> Self {
        Self {
            command: "",
            args: Vec::new(),
        }
    }

    /// Get argument by index (0-based)
    pub fn arg(&self, idx: usize) -> Option<&'a str> {
        self.args.get(idx).copied()
    }

    /// Number of arguments
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }
}

/// Parse a command line into command and arguments
pub fn parse_line(line: &str) -> ParsedCommand<'_> {
    let mut parts = line.split_whitespace();

    let command = parts.next().unwrap_or("");

    let mut args = Vec::new();
    for arg in parts.take(MAX_ARGS) {
        // take() bounds the count, push cannot fail
        let _ = args.push(arg);
    }

    ParsedCommand { command, args }
}

/// Parse a committed line straight from the history slot
pub fn parse_bytes(line: &[u8]) -> Result<ParsedCommand<'_>, ConsoleError> {
    let text = core::str::from_utf8(line).map_err(|_| ConsoleError::BadEncoding)?;
    Ok(parse_line(text))
}
