//! Global log stream instances.
//!
//! One stream per producer context, both drained by the main loop.

use crate::logging::LogStream;

/// RX log stream (receive interrupt only).
///
/// Single producer (UART RX handler), single consumer (log drain).
pub static RX_LOG_STREAM: LogStream = LogStream::new();

/// Console log stream (main loop: line editor and command interpreter).
///
/// Single producer (console), single consumer (log drain).
pub static CONSOLE_LOG_STREAM: LogStream = LogStream::new();
