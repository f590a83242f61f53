//! RustUartShell - Main entry point
//!
//! 1. Initialize logging and the console UART
//! 2. RX path pushes received bytes into `RX_QUEUE`
//! 3. Main loop feeds the console, flushes `TX_QUEUE`, drains logs
//!
//! On the host the same loop runs over stdin/stdout for development.

use rust_uart_shell::{
    config::CONFIG,
    console::{print_banner, AnsiRedraw, Console, Interpreter, DEFAULT_PROMPT},
    fault::{FaultCode, FaultState},
    hal::{ByteSink, CrlfWriter, RxChannel, UartConfig},
    uart_logger::NamedStream,
    ByteQueue, LogDrain, CONSOLE_LOG_STREAM, RX_LOG_STREAM, RX_QUEUE_SIZE, TX_QUEUE_SIZE,
};

// Shared between the RX context and the main loop
static RX_QUEUE: ByteQueue<RX_QUEUE_SIZE> = ByteQueue::new();
static TX_QUEUE: ByteQueue<TX_QUEUE_SIZE> = ByteQueue::new();
static FAULT_STATE: FaultState = FaultState::new();

type TxSink = &'static ByteQueue<TX_QUEUE_SIZE>;

/// Everything the main loop owns.
struct Shell {
    console: Console<'static, AnsiRedraw<TxSink>>,
    interpreter: Interpreter<CrlfWriter<TxSink>>,
    drain: LogDrain<'static, 2>,
    applied_generation: u32,
}

impl Shell {
    fn new() -> Self {
        Self {
            console: Console::new(AnsiRedraw::new(&TX_QUEUE), DEFAULT_PROMPT, &CONSOLE_LOG_STREAM),
            interpreter: Interpreter::new(CrlfWriter::new(&TX_QUEUE)),
            drain: LogDrain::new([
                NamedStream { name: "rx", stream: &RX_LOG_STREAM },
                NamedStream { name: "console", stream: &CONSOLE_LOG_STREAM },
            ]),
            applied_generation: CONFIG.generation(),
        }
    }

    fn start<S: ByteSink + ?Sized>(&mut self, now_us: i64, out: &mut S) {
        let mut tx = &TX_QUEUE;
        print_banner(&mut tx, DEFAULT_PROMPT);
        rust_uart_shell::log_info!(CONSOLE_LOG_STREAM, now_us, "console ready");
        TX_QUEUE.drain_to(out);
    }

    /// One pass of the main loop.
    fn service<S: ByteSink + ?Sized>(&mut self, now_us: i64, out: &mut S) {
        self.console.poll(&RX_QUEUE, now_us, &mut self.interpreter);
        self.apply_config(now_us);
        self.report_faults(now_us);

        TX_QUEUE.drain_to(out);

        // Log lines share the terminal with the prompt
        if self.drain.poll_to_log(now_us) {
            self.console.refresh();
            TX_QUEUE.drain_to(out);
        }
    }

    fn apply_config(&mut self, now_us: i64) {
        use core::sync::atomic::Ordering;

        let generation = CONFIG.generation();
        if generation != self.applied_generation {
            self.applied_generation = generation;
            rust_uart_shell::log_info!(
                CONSOLE_LOG_STREAM,
                now_us,
                "config gen {}: pwm {}Hz {}% led {} period {}ms",
                generation,
                CONFIG.pwm_freq_hz.load(Ordering::Relaxed),
                CONFIG.pwm_duty_pct.load(Ordering::Relaxed),
                CONFIG.led_enabled.load(Ordering::Relaxed),
                CONFIG.led_period_ms.load(Ordering::Relaxed)
            );
        }

        if let Some(req) = CONFIG.take_adc_request() {
            rust_uart_shell::log_info!(
                CONSOLE_LOG_STREAM,
                now_us,
                "adc capture ch={} freq={}Hz samples={}",
                req.channel,
                req.freq_hz,
                req.samples
            );
        }
    }

    fn report_faults(&mut self, now_us: i64) {
        let tx_dropped = TX_QUEUE.dropped();
        if tx_dropped > 0 {
            TX_QUEUE.reset_dropped();
            FAULT_STATE.set(FaultCode::TxOverrun, tx_dropped);
        }

        if FAULT_STATE.is_active() {
            let snap = FAULT_STATE.snapshot();
            rust_uart_shell::log_warn!(
                CONSOLE_LOG_STREAM,
                now_us,
                "fault {} data={} total={}",
                snap.code.as_str(),
                snap.data,
                snap.count
            );
            FAULT_STATE.clear();
        }
    }
}

#[cfg(target_os = "espidf")]
fn main() -> Result<(), esp_idf_svc::sys::EspError> {
    use esp_idf_svc::hal::peripherals::Peripherals;
    use rust_uart_shell::hal::uart::esp::{init_console_uart, EspUartSink};

    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let config = UartConfig::default();

    #[cfg(feature = "esp32p4")]
    let (tx_pin, rx_pin) = (peripherals.pins.gpio37, peripherals.pins.gpio38);
    #[cfg(not(feature = "esp32p4"))]
    let (tx_pin, rx_pin) = (peripherals.pins.gpio43, peripherals.pins.gpio44);

    let uart = init_console_uart(peripherals.uart0, tx_pin, rx_pin, &config)?;
    log::info!("console on UART0 @ {} baud", config.baud_rate);

    let rx = RxChannel::new(&RX_QUEUE, &FAULT_STATE, &RX_LOG_STREAM);
    let mut out = EspUartSink { uart: &uart, fault: &FAULT_STATE };
    let mut shell = Shell::new();
    let mut buf = [0u8; 64];

    shell.start(timestamp_us(), &mut out);

    loop {
        match uart.read(&mut buf, config.read_timeout_ticks) {
            Ok(n) => {
                rx.on_bytes(&buf[..n], timestamp_us());
            }
            Err(e) => FAULT_STATE.set(FaultCode::UartError, e.code() as u32),
        }

        shell.service(timestamp_us(), &mut out);
    }
}

#[cfg(target_os = "espidf")]
fn timestamp_us() -> i64 {
    // SAFETY: esp_timer is started by the IDF before app_main
    unsafe { esp_idf_svc::sys::esp_timer_get_time() }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
    use std::io::{Read, Write};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    static STDIN_CLOSED: AtomicBool = AtomicBool::new(false);

    struct StdoutSink(std::io::Stdout);

    impl ByteSink for StdoutSink {
        fn write_bytes(&mut self, bytes: &[u8]) {
            let mut lock = self.0.lock();
            if lock.write_all(bytes).and_then(|_| lock.flush()).is_err() {
                FAULT_STATE.set(FaultCode::UartError, 0);
            }
        }
    }

    let _ = TermLogger::init(
        LevelFilter::Debug,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let config = UartConfig::default();
    log::info!("host console on stdin/stdout (target baud {})", config.baud_rate);

    let start = Instant::now();
    let now_us = move || start.elapsed().as_micros() as i64;

    std::thread::spawn(move || {
        let rx = RxChannel::new(&RX_QUEUE, &FAULT_STATE, &RX_LOG_STREAM);
        let mut stdin = std::io::stdin();
        let mut buf = [0u8; 64];
        loop {
            match stdin.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    for &b in &buf[..n] {
                        // Line-buffered terminals send LF where a raw serial port sends CR
                        let b = if b == b'\n' { b'\r' } else { b };
                        rx.on_byte(b, now_us());
                    }
                }
            }
        }
        STDIN_CLOSED.store(true, Ordering::Release);
    });

    let mut out = StdoutSink(std::io::stdout());
    let mut shell = Shell::new();
    shell.start(now_us(), &mut out);

    loop {
        let closed = STDIN_CLOSED.load(Ordering::Acquire);
        shell.service(now_us(), &mut out);
        if closed && RX_QUEUE.is_empty() {
            break;
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    let _ = out.0.lock().write_all(b"\r\n");
}
