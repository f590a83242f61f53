//! End-to-end console session: raw bytes in, terminal bytes and command
//! output out.

use pretty_assertions::assert_eq;
use rust_uart_shell::console::{print_banner, AnsiRedraw, Console, Interpreter, Outcome, DEFAULT_PROMPT};
use rust_uart_shell::console::{ConsoleError, EditError};
use rust_uart_shell::fault::{FaultCode, FaultState};
use rust_uart_shell::hal::{ByteSink, CrlfWriter, RxChannel};
use rust_uart_shell::logging::{LogLevel, LogStream};
use rust_uart_shell::ByteQueue;

#[derive(Default)]
struct Capture(Vec<u8>);

impl ByteSink for Capture {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }
}

type TestConsole<'a> = Console<'a, AnsiRedraw<Capture>>;

fn console(log: &LogStream) -> TestConsole<'_> {
    Console::new(AnsiRedraw::new(Capture::default()), DEFAULT_PROMPT, log)
}

fn interpreter() -> Interpreter<CrlfWriter<Capture>> {
    Interpreter::new(CrlfWriter::new(Capture::default()))
}

fn feed(console: &mut TestConsole<'_>, interp: &mut Interpreter<CrlfWriter<Capture>>, bytes: &[u8]) {
    for &b in bytes {
        console.on_byte(b, 0, interp);
    }
}

fn screen(console: &TestConsole<'_>) -> String {
    String::from_utf8_lossy(&console.term().sink().0).into_owned()
}

fn command_output(interp: &mut Interpreter<CrlfWriter<Capture>>) -> String {
    String::from_utf8_lossy(&interp.writer_mut().sink_mut().0).into_owned()
}

#[test]
fn test_get_command_round_trip() {
    let log: LogStream = LogStream::new();
    let mut c = console(&log);
    let mut interp = interpreter();
    let rx = ByteQueue::<256>::new();

    rx.push_slice(b"get pwmDuty\r\n");
    assert_eq!(c.poll(&rx, 42, &mut interp), 1);

    assert_eq!(screen(&c), "get pwmDuty\r\n> ");
    assert_eq!(command_output(&mut interp), "\r\npwmDuty=50\r\n");
    assert_eq!(interp.executed(), 1);
    assert_eq!(interp.last_error(), None);
    assert_eq!(c.editor().history().line(0), b"get pwmDuty");

    let entry = log.drain().unwrap();
    assert_eq!(entry.level, LogLevel::Debug);
    assert_eq!(entry.timestamp_us, 42);
    assert_eq!(entry.message(), "line committed: slot=0 len=11");
}

#[test]
fn test_unknown_command_reports_error() {
    let log: LogStream = LogStream::new();
    let mut c = console(&log);
    let mut interp = interpreter();

    feed(&mut c, &mut interp, b"bogus\r");

    assert_eq!(command_output(&mut interp), "\r\nERROR: E01: unknown command\r\n");
    assert_eq!(interp.last_error(), Some(ConsoleError::UnknownCommand));
}

#[test]
fn test_recall_and_rerun() {
    let log: LogStream = LogStream::new();
    let mut c = console(&log);
    let mut interp = interpreter();

    feed(&mut c, &mut interp, b"set ledPeriod 700\r");
    feed(&mut c, &mut interp, b"get ledPeriod\r");
    c.term_mut().sink_mut().0.clear();

    // Up, Up: back to the set command
    feed(&mut c, &mut interp, b"\x1b[A\x1b[A");
    assert_eq!(c.editor().line().as_bytes(), b"set ledPeriod 700");
    assert_eq!(
        screen(&c),
        "\x1b[2K\r> get ledPeriod\x1b[2K\r> set ledPeriod 700"
    );

    // Down: forward to the get command, Enter runs it again
    feed(&mut c, &mut interp, b"\x1b[B\r");
    assert_eq!(interp.executed(), 3);
    assert!(command_output(&mut interp).ends_with("\r\nledPeriod=700\r\n"));
    assert_eq!(c.editor().history().len(), 3);
}

#[test]
fn test_backspace_edit_before_enter() {
    let log: LogStream = LogStream::new();
    let mut c = console(&log);
    let mut lines: Vec<Vec<u8>> = Vec::new();
    let mut consumer = |line: &[u8]| lines.push(line.to_vec());

    for &b in b"helq\x7fp\r" {
        c.on_byte(b, 0, &mut consumer);
    }

    assert_eq!(lines, vec![b"help".to_vec()]);
    assert_eq!(screen(&c), "helq\x7f \x1b[Dp\r\n> ");
}

#[test]
fn test_boundary_keys_are_absorbed_and_traced() {
    let log: LogStream = LogStream::new();
    let mut c = console(&log);
    let mut interp = interpreter();

    assert_eq!(c.on_byte(0x7f, 5, &mut interp), Outcome::Absorbed(EditError::AtBoundary));
    assert_eq!(screen(&c), "");

    let entry = log.drain().unwrap();
    assert_eq!(entry.level, LogLevel::Trace);
    assert_eq!(entry.message(), "Backspace absorbed: cursor at boundary");
}

#[test]
fn test_empty_enter_only_reprompts() {
    let log: LogStream = LogStream::new();
    let mut c = console(&log);
    let mut interp = interpreter();

    feed(&mut c, &mut interp, b"\r");
    assert_eq!(screen(&c), "\r\n> ");
    assert_eq!(interp.executed(), 0);
    assert!(c.editor().history().is_empty());
}

#[test]
fn test_refresh_repaints_current_line() {
    let log: LogStream = LogStream::new();
    let mut c = console(&log);
    let mut interp = interpreter();

    feed(&mut c, &mut interp, b"get\x1b[D");
    c.term_mut().sink_mut().0.clear();
    c.refresh();
    assert_eq!(screen(&c), "\x1b[2K\r> get\x1b[D");
}

#[test]
fn test_rx_overrun_latches_fault() {
    let log: LogStream = LogStream::new();
    let rx_log: LogStream = LogStream::new();
    let fault = FaultState::new();
    let queue = ByteQueue::<8>::new();
    let rx = RxChannel::new(&queue, &fault, &rx_log);

    assert_eq!(rx.on_bytes(b"get pwmFreq\r", 0), 8);
    assert_eq!(fault.code(), FaultCode::RxOverrun);
    assert!(rx_log.has_entries());

    let mut c = console(&log);
    let mut interp = interpreter();
    assert_eq!(c.poll(&queue, 0, &mut interp), 0);
    assert_eq!(c.editor().line().as_bytes(), b"get pwmF");
}

#[test]
fn test_banner() {
    let mut out = Capture::default();
    print_banner(&mut out, DEFAULT_PROMPT);
    let text = String::from_utf8(out.0).unwrap();
    assert!(text.starts_with("\r\nRustUartShell v"));
    assert!(text.ends_with("Type 'help' for commands.\r\n> "));
}
