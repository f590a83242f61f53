//! Line editor controller tests
//!
//! The editor is driven with decoded events and a recording terminal, so
//! these tests check transitions independent of escape bytes.

use pretty_assertions::assert_eq;
use rust_uart_shell::console::decoder::DecodedEvent;
use rust_uart_shell::console::editor::{LineEditor, Outcome};
use rust_uart_shell::console::line_buffer::{Erased, LineBuffer, LINE_SIZE};
use rust_uart_shell::console::redraw::Redraw;
use rust_uart_shell::console::EditError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Echo(u8),
    Erase(Erased),
    Left,
    Right,
    Line(Vec<u8>, usize),
    Prompt,
}

#[derive(Default)]
struct RecordingTerm {
    calls: Vec<Call>,
}

impl Redraw for RecordingTerm {
    fn echo_char(&mut self, byte: u8) {
        self.calls.push(Call::Echo(byte));
    }

    fn echo_erase(&mut self, erased: Erased) {
        self.calls.push(Call::Erase(erased));
    }

    fn cursor_left(&mut self) {
        self.calls.push(Call::Left);
    }

    fn cursor_right(&mut self) {
        self.calls.push(Call::Right);
    }

    fn redraw_line(&mut self, _prompt: &str, line: &LineBuffer) {
        self.calls.push(Call::Line(line.as_bytes().to_vec(), line.cursor()));
    }

    fn redraw_prompt(&mut self, _prompt: &str) {
        self.calls.push(Call::Prompt);
    }
}

struct Harness<const D: usize = 16> {
    editor: LineEditor<D>,
    term: RecordingTerm,
    lines: Vec<Vec<u8>>,
}

impl<const D: usize> Harness<D> {
    fn new() -> Self {
        Self {
            editor: LineEditor::new("> "),
            term: RecordingTerm::default(),
            lines: Vec::new(),
        }
    }

    fn send(&mut self, event: DecodedEvent) -> Outcome {
        let lines = &mut self.lines;
        let mut consumer = |line: &[u8]| lines.push(line.to_vec());
        self.editor.handle(event, &mut self.term, &mut consumer)
    }

    fn type_text(&mut self, text: &str) {
        for &b in text.as_bytes() {
            self.send(DecodedEvent::Printable(b));
        }
    }

    fn enter_line(&mut self, text: &str) -> Outcome {
        self.type_text(text);
        self.send(DecodedEvent::Enter)
    }

    fn buffer(&self) -> &[u8] {
        self.editor.line().as_bytes()
    }
}

#[test]
fn test_typing_echoes_each_byte() {
    let mut h: Harness = Harness::new();
    h.type_text("help");

    assert_eq!(h.buffer(), b"help");
    assert_eq!(h.editor.line().cursor(), h.editor.line().high_water());
    assert_eq!(
        h.term.calls,
        vec![Call::Echo(b'h'), Call::Echo(b'e'), Call::Echo(b'l'), Call::Echo(b'p')]
    );
}

#[test]
fn test_enter_hands_line_to_consumer() {
    let mut h: Harness = Harness::new();
    let outcome = h.enter_line("get pwmFreq");

    assert_eq!(outcome, Outcome::Committed { slot: 0, len: 11 });
    assert_eq!(h.lines, vec![b"get pwmFreq".to_vec()]);
    assert_eq!(h.editor.history().line(0), b"get pwmFreq");
    assert_eq!(h.editor.history().write_index(), 1);
    assert!(h.editor.line().is_empty());
    assert_eq!(h.term.calls.last(), Some(&Call::Prompt));
}

#[test]
fn test_enter_on_empty_line() {
    let mut h: Harness = Harness::new();
    let outcome = h.send(DecodedEvent::Enter);

    assert_eq!(outcome, Outcome::Absorbed(EditError::EmptyCommit));
    assert!(h.lines.is_empty());
    assert_eq!(h.editor.history().write_index(), 0);
    assert_eq!(h.term.calls, vec![Call::Prompt]);
}

#[test]
fn test_up_arrow_walks_history() {
    let mut h: Harness = Harness::new();
    h.enter_line("cmdA");
    h.enter_line("cmdB");

    assert_eq!(h.send(DecodedEvent::ArrowUp), Outcome::Applied);
    assert_eq!(h.buffer(), b"cmdB");
    assert_eq!(h.send(DecodedEvent::ArrowUp), Outcome::Applied);
    assert_eq!(h.buffer(), b"cmdA");

    h.term.calls.clear();
    assert_eq!(
        h.send(DecodedEvent::ArrowUp),
        Outcome::Absorbed(EditError::HistoryExhausted)
    );
    assert_eq!(h.buffer(), b"cmdA");
    assert!(h.term.calls.is_empty()); // no redraw on a refused recall
}

#[test]
fn test_recall_restores_saved_cursor() {
    let mut h: Harness = Harness::new();
    h.type_text("set pwmDuty 40");
    h.send(DecodedEvent::ArrowLeft);
    h.send(DecodedEvent::ArrowLeft);
    h.send(DecodedEvent::Enter);

    h.send(DecodedEvent::ArrowUp);
    assert_eq!(h.buffer(), b"set pwmDuty 40");
    assert_eq!(h.editor.line().cursor(), 12);
    assert_eq!(h.term.calls.last(), Some(&Call::Line(b"set pwmDuty 40".to_vec(), 12)));
}

#[test]
fn test_down_arrow_returns_to_blank_line() {
    let mut h: Harness = Harness::new();
    h.enter_line("first");
    h.enter_line("second");

    h.send(DecodedEvent::ArrowUp);
    h.send(DecodedEvent::ArrowUp);
    assert_eq!(h.buffer(), b"first");

    assert_eq!(h.send(DecodedEvent::ArrowDown), Outcome::Applied);
    assert_eq!(h.buffer(), b"second");

    assert_eq!(h.send(DecodedEvent::ArrowDown), Outcome::Applied);
    assert!(h.editor.line().is_empty());
    assert_eq!(h.term.calls.last(), Some(&Call::Line(Vec::new(), 0)));

    assert_eq!(
        h.send(DecodedEvent::ArrowDown),
        Outcome::Absorbed(EditError::HistoryExhausted)
    );
}

#[test]
fn test_down_arrow_without_history() {
    let mut h: Harness = Harness::new();
    h.type_text("abc");
    assert_eq!(
        h.send(DecodedEvent::ArrowDown),
        Outcome::Absorbed(EditError::HistoryExhausted)
    );
    assert_eq!(h.buffer(), b"abc");
}

#[test]
fn test_wraparound_drops_oldest() {
    let mut h: Harness<4> = Harness::new();
    for i in 0..5 {
        h.enter_line(&format!("cmd{}", i));
    }

    let mut recalled = Vec::new();
    for _ in 0..4 {
        h.send(DecodedEvent::ArrowUp);
        recalled.push(h.buffer().to_vec());
    }
    assert_eq!(
        recalled,
        vec![b"cmd4".to_vec(), b"cmd3".to_vec(), b"cmd2".to_vec(), b"cmd1".to_vec()]
    );
    assert!(!recalled.contains(&b"cmd0".to_vec()));
    assert_eq!(
        h.send(DecodedEvent::ArrowUp),
        Outcome::Absorbed(EditError::HistoryExhausted)
    );
}

#[test]
fn test_backspace_at_end() {
    let mut h: Harness = Harness::new();
    h.type_text("helpx");
    h.term.calls.clear();

    assert_eq!(h.send(DecodedEvent::Backspace), Outcome::Applied);
    assert_eq!(h.buffer(), b"help");
    assert_eq!(h.term.calls, vec![Call::Erase(Erased::Tail)]);
}

#[test]
fn test_backspace_on_empty_line() {
    let mut h: Harness = Harness::new();
    assert_eq!(
        h.send(DecodedEvent::Backspace),
        Outcome::Absorbed(EditError::AtBoundary)
    );
    assert!(h.term.calls.is_empty());
}

#[test]
fn test_arrows_move_cursor_only() {
    let mut h: Harness = Harness::new();
    h.type_text("ab");
    h.term.calls.clear();

    assert_eq!(h.send(DecodedEvent::ArrowRight), Outcome::Absorbed(EditError::AtBoundary));
    assert_eq!(h.send(DecodedEvent::ArrowLeft), Outcome::Applied);
    assert_eq!(h.send(DecodedEvent::ArrowLeft), Outcome::Applied);
    assert_eq!(h.send(DecodedEvent::ArrowLeft), Outcome::Absorbed(EditError::AtBoundary));
    assert_eq!(h.send(DecodedEvent::ArrowRight), Outcome::Applied);

    assert_eq!(h.buffer(), b"ab");
    assert_eq!(h.editor.line().cursor(), 1);
    assert_eq!(h.term.calls, vec![Call::Left, Call::Left, Call::Right]);
}

#[test]
fn test_full_buffer_absorbs_input() {
    let mut h: Harness = Harness::new();
    for _ in 0..LINE_SIZE - 1 {
        h.send(DecodedEvent::Printable(b'x'));
    }
    h.term.calls.clear();

    assert_eq!(
        h.send(DecodedEvent::Printable(b'y')),
        Outcome::Absorbed(EditError::BufferFull)
    );
    assert_eq!(h.editor.line().len(), LINE_SIZE - 1);
    assert!(h.term.calls.is_empty());
}

#[test]
fn test_clear_screen_discards_line() {
    let mut h: Harness = Harness::new();
    h.enter_line("one");
    h.send(DecodedEvent::ArrowUp);
    h.term.calls.clear();

    assert_eq!(h.send(DecodedEvent::ClearScreen), Outcome::Applied);
    assert!(h.editor.line().is_empty());
    assert!(!h.editor.history().is_browsing());
    assert_eq!(h.term.calls, vec![Call::Prompt]);
    assert_eq!(h.editor.history().len(), 1);
}

#[test]
fn test_edit_while_browsing_does_not_touch_history() {
    let mut h: Harness = Harness::new();
    h.enter_line("get pwmFreq");

    h.send(DecodedEvent::ArrowUp);
    h.send(DecodedEvent::Backspace);
    h.type_text("X");
    assert_eq!(h.buffer(), b"get pwmFreX");
    assert_eq!(h.editor.history().line(0), b"get pwmFreq");

    h.send(DecodedEvent::Enter);
    assert_eq!(h.lines.last(), Some(&b"get pwmFreX".to_vec()));
    assert_eq!(h.editor.history().line(0), b"get pwmFreq");
    assert_eq!(h.editor.history().line(1), b"get pwmFreX");
}

#[test]
fn test_ignored_event() {
    let mut h: Harness = Harness::new();
    assert_eq!(h.send(DecodedEvent::Ignored), Outcome::Ignored);
    assert!(h.term.calls.is_empty());
}
