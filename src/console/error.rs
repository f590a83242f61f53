//! Console error types
//!
//! Two families:
//! - [`EditError`]: keystrokes the line editor refuses. Always absorbed
//!   locally, never surfaced to the byte-arrival caller.
//! - [`ConsoleError`]: failures of a committed command line, printed by the
//!   interpreter as `ERROR: <code>: <message>`.

use thiserror::Error;

use crate::config::ParamSetError;

/// Rejected editing operation
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    /// Insert with the working buffer at capacity
    #[error("line buffer full")]
    BufferFull,
    /// Cursor already at offset 0 or at the high-water mark
    #[error("cursor at boundary")]
    AtBoundary,
    /// Up/Down past the available history entries
    #[error("history exhausted")]
    HistoryExhausted,
    /// Enter on an empty line
    #[error("empty commit")]
    EmptyCommit,
}

/// Console error with code and message
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// E01: Unknown command
    #[error("E01: unknown command")]
    UnknownCommand,
    /// E02: Invalid value format
    #[error("E02: invalid value")]
    InvalidValue,
    /// E03: Missing required argument
    #[error("E03: missing argument")]
    MissingArg,
    /// E04: Value out of allowed range
    #[error("E04: out of range")]
    OutOfRange,
    /// E05: Line is not valid UTF-8
    #[error("E05: bad encoding")]
    BadEncoding,
}

impl ConsoleError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::InvalidValue => "E02",
            Self::MissingArg => "E03",
            Self::OutOfRange => "E04",
            Self::BadEncoding => "E05",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::InvalidValue => "invalid value",
            Self::MissingArg => "missing argument",
            Self::OutOfRange => "out of range",
            Self::BadEncoding => "bad encoding",
        }
    }
}

impl From<ParamSetError> for ConsoleError {
    fn from(e: ParamSetError) -> Self {
        match e {
            ParamSetError::Invalid => Self::InvalidValue,
            ParamSetError::OutOfRange => Self::OutOfRange,
        }
    }
}
