//! Serial console: line editor with history plus command interpreter
//!
//! ```text
//! RX queue ─▶ Decoder ─▶ LineEditor ─▶ Redraw ─▶ TX
//!                           │
//!                           └─(Enter)─▶ CommandSink (Interpreter)
//! ```
//!
//! Polled from the main loop - no dedicated task.
//! Zero heap allocation - all static buffers.

pub mod commands;
#[allow(clippy::module_inception)]
pub mod console;
pub mod decoder;
pub mod editor;
pub mod error;
pub mod history;
pub mod interpreter;
pub mod line_buffer;
pub mod parser;
pub mod redraw;

/// Prompt printed before every line
pub const DEFAULT_PROMPT: &str = "> ";

pub use commands::{command_names, execute, CommandDescriptor, COMMANDS, RUN_COMMANDS};
pub use console::{print_banner, Console, VERSION};
pub use decoder::{DecodedEvent, Decoder, EscapeStage};
pub use editor::{CommandSink, LineEditor, Outcome};
pub use error::{ConsoleError, EditError};
pub use history::{History, HistorySlot, Recall, HISTORY_DEPTH};
pub use interpreter::Interpreter;
pub use line_buffer::{Erased, LineBuffer, LINE_SIZE};
pub use parser::{parse_bytes, parse_line, ParsedCommand, MAX_ARGS};
pub use redraw::{AnsiRedraw, Redraw};
