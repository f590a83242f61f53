//! Escape-sequence decoder
//!
//! Turns the raw receive stream into editing events, one event per byte.
//! Only the three-byte `ESC [ X` arrow sequences are recognised; anything
//! else starting with ESC is swallowed, not replayed.
//!
//! ```text
//!            27                91              65..=68
//!  Idle ───────────▶ SawEsc ─────────▶ SawBracket ─────────▶ Idle (Arrow*)
//!   ▲                  │ other              │ other
//!   └──────────────────┴────────────────────┘ (Ignored)
//! ```

/// ESC
pub const ESC: u8 = 27;
/// `[` following ESC
pub const CSI_BRACKET: u8 = b'[';
/// Carriage return (Enter)
pub const CR: u8 = b'\r';
/// Line feed (ignored, terminals send it after CR)
pub const LF: u8 = b'\n';
/// Form feed (Ctrl-L)
pub const FORM_FEED: u8 = 12;
/// DEL (what most terminals send for Backspace)
pub const DEL: u8 = 127;

/// Final bytes of the arrow sequences
pub const ARROW_UP: u8 = b'A';
pub const ARROW_DOWN: u8 = b'B';
pub const ARROW_RIGHT: u8 = b'C';
pub const ARROW_LEFT: u8 = b'D';

/// Position inside an escape sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeStage {
    Idle,
    /// Got ESC
    SawEsc,
    /// Got ESC [
    SawBracket,
}

/// Logical input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedEvent {
    /// Any byte without special meaning, including other control codes
    Printable(u8),
    Enter,
    Backspace,
    ClearScreen,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    /// Sequence prefix, LF, or a dropped malformed sequence
    Ignored,
}

/// Escape-sequence state machine
#[derive(Debug)]
pub struct Decoder {
    stage: EscapeStage,
}

impl Decoder {
    /// Create decoder in the idle stage
    pub const fn new() -> Self {
        Self { stage: EscapeStage::Idle }
    }

    /// Current escape stage
    pub fn stage(&self) -> EscapeStage {
        self.stage
    }

    /// Drop any partial sequence
    pub fn reset(&mut self) {
        self.stage = EscapeStage::Idle;
    }

    /// Classify one byte
    ///
    /// Never blocks. A complete arrow sequence yields
    /// `Ignored, Ignored, Arrow*`.
    pub fn decode(&mut self, byte: u8) -> DecodedEvent {
        match self.stage {
            EscapeStage::Idle => match byte {
                ESC => {
                    self.stage = EscapeStage::SawEsc;
                    DecodedEvent::Ignored
                }
                CR => DecodedEvent::Enter,
                FORM_FEED => DecodedEvent::ClearScreen,
                LF => DecodedEvent::Ignored,
                DEL => DecodedEvent::Backspace,
                _ => DecodedEvent::Printable(byte),
            },
            EscapeStage::SawEsc => {
                self.stage = if byte == CSI_BRACKET {
                    EscapeStage::SawBracket
                } else {
                    EscapeStage::Idle
                };
                DecodedEvent::Ignored
            }
            EscapeStage::SawBracket => {
                self.stage = EscapeStage::Idle;
                match byte {
                    ARROW_LEFT => DecodedEvent::ArrowLeft,
                    ARROW_RIGHT => DecodedEvent::ArrowRight,
                    ARROW_DOWN => DecodedEvent::ArrowDown,
                    ARROW_UP => DecodedEvent::ArrowUp,
                    _ => DecodedEvent::Ignored,
                }
            }
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
