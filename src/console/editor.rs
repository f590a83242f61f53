//! Line editor controller
//!
//! Applies decoded events to the working buffer and the history ring.
//! There is one state, `Editing`; browsing history is just a flag on the
//! ring. Rejected keystrokes are absorbed and reported as
//! [`Outcome::Absorbed`], never as failures.
//!
//! | Event        | Action                                                   |
//! |--------------|----------------------------------------------------------|
//! | Printable(b) | insert, echo                                             |
//! | Backspace    | backspace, echo erase                                    |
//! | ArrowLeft    | shift left, cursor left                                  |
//! | ArrowRight   | shift right, cursor right                                |
//! | ArrowUp      | recall older, load, redraw line                          |
//! | ArrowDown    | recall newer, load (or blank), redraw line               |
//! | Enter        | commit, clear, hand line to consumer, redraw prompt      |
//! | ClearScreen  | clear, redraw prompt                                     |

use super::decoder::DecodedEvent;
use super::error::EditError;
use super::history::{History, Recall, HISTORY_DEPTH};
use super::line_buffer::LineBuffer;
use super::redraw::Redraw;

/// Receiver of committed lines (the command interpreter)
///
/// Called synchronously on Enter, at most once per committed line, with a
/// non-empty view of the history slot just written.
pub trait CommandSink {
    fn on_line(&mut self, line: &[u8]);
}

impl<F: FnMut(&[u8])> CommandSink for F {
    fn on_line(&mut self, line: &[u8]) {
        self(line)
    }
}

/// Result of one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do (escape prefix, LF, malformed sequence)
    Ignored,
    /// Buffer or history state changed
    Applied,
    /// Keystroke refused, state unchanged
    Absorbed(EditError),
    /// Line committed to `slot` and handed to the consumer
    Committed { slot: usize, len: usize },
}

/// Working buffer plus history, driven by decoded events
pub struct LineEditor<const D: usize = HISTORY_DEPTH> {
    line: LineBuffer,
    history: History<D>,
    prompt: &'static str,
}

impl<const D: usize> LineEditor<D> {
    /// Create editor with an empty line and history
    pub const fn new(prompt: &'static str) -> Self {
        Self {
            line: LineBuffer::new(),
            history: History::new(),
            prompt,
        }
    }

    /// Apply one event
    pub fn handle<R, C>(&mut self, event: DecodedEvent, term: &mut R, consumer: &mut C) -> Outcome
    where
        R: Redraw + ?Sized,
        C: CommandSink + ?Sized,
    {
        match event {
            DecodedEvent::Printable(b) => match self.line.insert(b) {
                Ok(()) => {
                    term.echo_char(b);
                    Outcome::Applied
                }
                Err(e) => Outcome::Absorbed(e),
            },

            DecodedEvent::Backspace => match self.line.backspace() {
                Ok(erased) => {
                    term.echo_erase(erased);
                    Outcome::Applied
                }
                Err(e) => Outcome::Absorbed(e),
            },

            DecodedEvent::ArrowLeft => match self.line.shift_left() {
                Ok(()) => {
                    term.cursor_left();
                    Outcome::Applied
                }
                Err(e) => Outcome::Absorbed(e),
            },

            DecodedEvent::ArrowRight => match self.line.shift_right() {
                Ok(()) => {
                    term.cursor_right();
                    Outcome::Applied
                }
                Err(e) => Outcome::Absorbed(e),
            },

            DecodedEvent::ArrowUp => match self.recall_older() {
                Ok(()) => {
                    term.redraw_line(self.prompt, &self.line);
                    Outcome::Applied
                }
                Err(e) => Outcome::Absorbed(e),
            },

            DecodedEvent::ArrowDown => match self.recall_newer() {
                Ok(()) => {
                    term.redraw_line(self.prompt, &self.line);
                    Outcome::Applied
                }
                Err(e) => Outcome::Absorbed(e),
            },

            DecodedEvent::Enter => {
                let committed = self.history.commit(&self.line);
                self.line.clear();
                self.history.reset_browse();

                let outcome = match committed {
                    Ok(slot) => {
                        let line = self.history.line(slot);
                        consumer.on_line(line);
                        Outcome::Committed { slot, len: line.len() }
                    }
                    Err(e) => Outcome::Absorbed(e),
                };

                term.redraw_prompt(self.prompt);
                outcome
            }

            DecodedEvent::ClearScreen => {
                self.line.clear();
                self.history.reset_browse();
                term.redraw_prompt(self.prompt);
                Outcome::Applied
            }

            DecodedEvent::Ignored => Outcome::Ignored,
        }
    }

    fn recall_older(&mut self) -> Result<(), EditError> {
        let slot = self.history.recall_older()?;
        self.line.clear();
        self.history.load(slot, &mut self.line)
    }

    fn recall_newer(&mut self) -> Result<(), EditError> {
        match self.history.recall_newer()? {
            Recall::Slot(slot) => {
                self.line.clear();
                self.history.load(slot, &mut self.line)
            }
            Recall::Live => {
                self.line.clear();
                Ok(())
            }
        }
    }

    /// Current working buffer
    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    /// History ring
    pub fn history(&self) -> &History<D> {
        &self.history
    }

    /// Prompt printed before each line
    pub fn prompt(&self) -> &'static str {
        self.prompt
    }
}
