//! Log drain for the main loop.
//!
//! Empties the interrupt-safe [`LogStream`]s either into a byte sink
//! (a dedicated log UART, or the console port itself) or into the `log`
//! facade, which the binary backs with `EspLogger` on target and
//! `simplelog` on the host.
//!
//! # Output format
//!
//! ```text
//! [timestamp_us] LEVEL: message\r\n
//! ```

use crate::hal::uart::ByteSink;
use crate::logging::{BufWriter, LogEntry, LogStream};

/// Interval between dropped-message reports.
pub const DROPPED_REPORT_INTERVAL_US: i64 = 10_000_000;

/// `log` target used when forwarding to the facade.
pub const LOG_TARGET: &str = "shell";

/// Format log entry to string.
///
/// Format: `[timestamp_us] LEVEL: message\r\n`
fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    use core::fmt::Write;

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = write!(
        writer,
        "[{:10}] {}: {}\r\n",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    );
    writer.pos
}

/// A stream and the name it is reported under.
pub struct NamedStream<'a> {
    pub name: &'static str,
    pub stream: &'a LogStream,
}

/// Drains log streams in priority order (first stream first).
pub struct LogDrain<'a, const K: usize> {
    streams: [NamedStream<'a>; K],
    last_dropped_report: i64,
}

impl<'a, const K: usize> LogDrain<'a, K> {
    pub const fn new(streams: [NamedStream<'a>; K]) -> Self {
        Self {
            streams,
            last_dropped_report: 0,
        }
    }

    /// Write all pending entries to a byte sink.
    ///
    /// Returns `true` if anything was written.
    pub fn poll_to_sink<S: ByteSink + ?Sized>(&mut self, now_us: i64, sink: &mut S) -> bool {
        let mut format_buf = [0u8; 192];
        let mut work_done = false;

        for named in &self.streams {
            while let Some(entry) = named.stream.drain() {
                let len = format_log_entry(&entry, &mut format_buf);
                sink.write_bytes(&format_buf[..len]);
                work_done = true;
            }
        }

        if self.report_due(now_us) {
            for named in &self.streams {
                let dropped = named.stream.dropped();
                if dropped > 0 {
                    use core::fmt::Write;
                    let mut msg = [0u8; 64];
                    let mut w = BufWriter { buf: &mut msg, pos: 0 };
                    let _ = write!(w, "[WARN] Dropped: {}={}\r\n", named.name, dropped);
                    let len = w.pos;
                    sink.write_bytes(&msg[..len]);
                    named.stream.reset_dropped();
                    work_done = true;
                }
            }
        }

        work_done
    }

    /// Forward all pending entries to the `log` facade.
    ///
    /// Returns `true` if anything was forwarded.
    pub fn poll_to_log(&mut self, now_us: i64) -> bool {
        let mut work_done = false;

        for named in &self.streams {
            while let Some(entry) = named.stream.drain() {
                log::log!(
                    target: LOG_TARGET,
                    entry.level.to_log_level(),
                    "[{}] {}: {}",
                    entry.timestamp_us,
                    named.name,
                    entry.message()
                );
                work_done = true;
            }
        }

        if self.report_due(now_us) {
            for named in &self.streams {
                let dropped = named.stream.dropped();
                if dropped > 0 {
                    log::warn!(target: LOG_TARGET, "{}: {} log entries dropped", named.name, dropped);
                    named.stream.reset_dropped();
                    work_done = true;
                }
            }
        }

        work_done
    }

    fn report_due(&mut self, now_us: i64) -> bool {
        if now_us - self.last_dropped_report > DROPPED_REPORT_INTERVAL_US {
            self.last_dropped_report = now_us;
            true
        } else {
            false
        }
    }
}
