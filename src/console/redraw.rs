//! Terminal echo and redraw
//!
//! The line editor never writes bytes itself; it calls a [`Redraw`]
//! implementation. [`AnsiRedraw`] is the real one and emits only:
//!
//! | Purpose                     | Bytes            |
//! |-----------------------------|------------------|
//! | erase line, go to column 0  | `ESC [ 2 K CR`   |
//! | cursor left one cell        | `ESC [ D`        |
//! | cursor right one cell       | `ESC [ C`        |
//! | newline                     | `CR LF`          |
//! | delete echo                 | `DEL`            |
//!
//! plus the prompt and line bytes themselves.

use super::decoder::{ARROW_LEFT, ARROW_RIGHT, CSI_BRACKET, DEL, ESC};
use super::line_buffer::{Erased, LineBuffer};
use crate::hal::uart::ByteSink;

/// Erase entire line, then carriage return
pub const ERASE_LINE: &[u8] = &[ESC, CSI_BRACKET, b'2', b'K', b'\r'];
/// Cursor one cell left
pub const CURSOR_LEFT: &[u8] = &[ESC, CSI_BRACKET, ARROW_LEFT];
/// Cursor one cell right
pub const CURSOR_RIGHT: &[u8] = &[ESC, CSI_BRACKET, ARROW_RIGHT];
/// Newline for raw-mode terminals
pub const NEWLINE: &[u8] = b"\r\n";

/// Rendering side of the line editor
pub trait Redraw {
    /// Echo a typed byte
    fn echo_char(&mut self, byte: u8);

    /// Echo a successful backspace
    fn echo_erase(&mut self, erased: Erased);

    /// Move the terminal cursor one cell left
    fn cursor_left(&mut self);

    /// Move the terminal cursor one cell right
    fn cursor_right(&mut self);

    /// Repaint prompt and line, leaving the cursor at the buffer's cursor
    fn redraw_line(&mut self, prompt: &str, line: &LineBuffer);

    /// Start a fresh line with the prompt
    fn redraw_prompt(&mut self, prompt: &str);
}

/// VT100/ANSI renderer over a byte sink
pub struct AnsiRedraw<S: ByteSink> {
    sink: S,
}

impl<S: ByteSink> AnsiRedraw<S> {
    pub const fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Access the underlying sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: ByteSink> Redraw for AnsiRedraw<S> {
    fn echo_char(&mut self, byte: u8) {
        self.sink.write_byte(byte);
    }

    fn echo_erase(&mut self, erased: Erased) {
        match erased {
            Erased::Tail => {
                // DEL steps back, then blank the vacated cell
                self.sink.write_byte(DEL);
                self.sink.write_byte(b' ');
                self.sink.write_bytes(CURSOR_LEFT);
            }
            // Content unchanged, only the cursor moved
            Erased::Interior => self.sink.write_bytes(CURSOR_LEFT),
        }
    }

    fn cursor_left(&mut self) {
        self.sink.write_bytes(CURSOR_LEFT);
    }

    fn cursor_right(&mut self) {
        self.sink.write_bytes(CURSOR_RIGHT);
    }

    fn redraw_line(&mut self, prompt: &str, line: &LineBuffer) {
        self.sink.write_bytes(ERASE_LINE);
        self.sink.write_bytes(prompt.as_bytes());
        self.sink.write_bytes(line.as_bytes());
        for _ in line.cursor()..line.high_water() {
            self.sink.write_bytes(CURSOR_LEFT);
        }
    }

    fn redraw_prompt(&mut self, prompt: &str) {
        self.sink.write_bytes(NEWLINE);
        self.sink.write_bytes(prompt.as_bytes());
    }
}
