//! Main console struct integrating all components

use super::decoder::Decoder;
use super::editor::{CommandSink, LineEditor, Outcome};
use super::history::HISTORY_DEPTH;
use super::redraw::{Redraw, NEWLINE};
use crate::byte_queue::ByteQueue;
use crate::hal::uart::ByteSink;
use crate::logging::LogStream;

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Console state: decoder stage, line editor and renderer.
///
/// Exactly one per serial port, owned by whoever processes received bytes.
/// Every byte is handled to completion before the next one; the type is
/// not safe for concurrent use and does not try to be.
pub struct Console<'a, R: Redraw, const D: usize = HISTORY_DEPTH> {
    decoder: Decoder,
    editor: LineEditor<D>,
    term: R,
    log: &'a LogStream,
}

impl<'a, R: Redraw, const D: usize> Console<'a, R, D> {
    /// Create new console
    pub const fn new(term: R, prompt: &'static str, log: &'a LogStream) -> Self {
        Self {
            decoder: Decoder::new(),
            editor: LineEditor::new(prompt),
            term,
            log,
        }
    }

    /// Process a single input byte
    ///
    /// Decodes, applies, renders and, on Enter, hands the committed line to
    /// `consumer` before returning.
    pub fn on_byte<C: CommandSink + ?Sized>(&mut self, byte: u8, now_us: i64, consumer: &mut C) -> Outcome {
        let event = self.decoder.decode(byte);
        let outcome = self.editor.handle(event, &mut self.term, consumer);

        match outcome {
            Outcome::Committed { slot, len } => {
                crate::log_debug!(self.log, now_us, "line committed: slot={} len={}", slot, len);
            }
            Outcome::Absorbed(e) => {
                crate::log_trace!(self.log, now_us, "{:?} absorbed: {}", event, e);
            }
            Outcome::Applied | Outcome::Ignored => {}
        }

        outcome
    }

    /// Feed everything waiting in the RX queue
    ///
    /// Returns the number of lines committed.
    pub fn poll<C: CommandSink + ?Sized, const N: usize>(
        &mut self,
        rx: &ByteQueue<N>,
        now_us: i64,
        consumer: &mut C,
    ) -> usize {
        let mut committed = 0;
        while let Some(byte) = rx.pop() {
            if let Outcome::Committed { .. } = self.on_byte(byte, now_us, consumer) {
                committed += 1;
            }
        }
        committed
    }

    /// Repaint prompt and current line (after lost bytes or log output)
    pub fn refresh(&mut self) {
        self.term.redraw_line(self.editor.prompt(), self.editor.line());
    }

    /// Line editor state
    pub fn editor(&self) -> &LineEditor<D> {
        &self.editor
    }

    /// Escape-sequence decoder state
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Renderer
    pub fn term(&self) -> &R {
        &self.term
    }

    pub fn term_mut(&mut self) -> &mut R {
        &mut self.term
    }
}

/// Print welcome banner followed by the first prompt
pub fn print_banner<S: ByteSink + ?Sized>(out: &mut S, prompt: &str) {
    out.write_bytes(NEWLINE);
    out.write_bytes(VERSION.as_bytes());
    out.write_bytes(NEWLINE);
    out.write_bytes(b"Type 'help' for commands.");
    out.write_bytes(NEWLINE);
    out.write_bytes(prompt.as_bytes());
}
