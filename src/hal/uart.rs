//! Console UART boundary.
//!
//! ```text
//! UART RX ──▶ RxChannel::on_byte ──▶ RX queue      (interrupt context)
//! TX queue ──▶ ByteSink (UART driver)               (main loop)
//! ```
//!
//! Register programming, pin muxing and interrupt wiring belong to the
//! ESP-IDF driver; this module only moves bytes.

use crate::byte_queue::ByteQueue;
use crate::fault::{FaultCode, FaultState};
use crate::logging::LogStream;

/// Outbound byte sink.
///
/// Implementations must preserve write order and must not block for long;
/// buffering is their business.
pub trait ByteSink {
    /// Write a run of bytes.
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Write a single byte.
    fn write_byte(&mut self, byte: u8) {
        self.write_bytes(&[byte]);
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_bytes(&mut self, bytes: &[u8]) {
        (**self).write_bytes(bytes);
    }
}

/// UART configuration for the console port.
pub struct UartConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
    pub rx_pin: u8,
    /// Driver read timeout in RTOS ticks
    pub read_timeout_ticks: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        #[cfg(feature = "esp32p4")]
        {
            Self {
                baud_rate: 115200,
                tx_pin: 37, // UART0 TX on ESP32-P4
                rx_pin: 38, // UART0 RX on ESP32-P4
                read_timeout_ticks: 1,
            }
        }

        #[cfg(not(feature = "esp32p4"))]
        {
            Self {
                baud_rate: 115200,
                tx_pin: 43, // UART0 TX on ESP32-S3 (USB-UART bridge)
                rx_pin: 44, // UART0 RX on ESP32-S3
                read_timeout_ticks: 1,
            }
        }
    }
}

/// `core::fmt::Write` adapter that expands `\n` to `\r\n`.
///
/// Serial terminals in raw mode do not return to column 0 on LF.
pub struct CrlfWriter<S: ByteSink> {
    sink: S,
}

impl<S: ByteSink> CrlfWriter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Access the underlying sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: ByteSink> core::fmt::Write for CrlfWriter<S> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let mut rest = s.as_bytes();
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            self.sink.write_bytes(&rest[..pos]);
            self.sink.write_bytes(b"\r\n");
            rest = &rest[pos + 1..];
        }
        self.sink.write_bytes(rest);
        Ok(())
    }
}

/// Byte-arrival handler for the receive interrupt.
///
/// Only pushes into the RX queue; all editing happens later in the main
/// loop, which keeps the interrupt path O(1).
pub struct RxChannel<'a, const N: usize> {
    queue: &'a ByteQueue<N>,
    fault: &'a FaultState,
    log: &'a LogStream,
}

impl<'a, const N: usize> RxChannel<'a, N> {
    pub const fn new(queue: &'a ByteQueue<N>, fault: &'a FaultState, log: &'a LogStream) -> Self {
        Self { queue, fault, log }
    }

    /// Queue one received byte.
    ///
    /// On overflow the byte is lost, `FaultCode::RxOverrun` is latched with
    /// the running drop count, and a warning is logged.
    #[inline]
    pub fn on_byte(&self, byte: u8, now_us: i64) -> bool {
        if self.queue.push(byte) {
            return true;
        }

        let dropped = self.queue.dropped();
        self.fault.set(FaultCode::RxOverrun, dropped);
        crate::log_warn!(self.log, now_us, "rx overrun, {} bytes dropped", dropped);
        false
    }

    /// Queue a burst from the driver FIFO.
    ///
    /// Returns the number of bytes accepted.
    pub fn on_bytes(&self, bytes: &[u8], now_us: i64) -> usize {
        bytes.iter().filter(|&&b| self.on_byte(b, now_us)).count()
    }
}

/// ESP-IDF UART driver glue.
#[cfg(target_os = "espidf")]
pub mod esp {
    use super::{ByteSink, UartConfig};
    use crate::fault::{FaultCode, FaultState};

    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::uart::{self, UartDriver};
    use esp_idf_svc::sys::EspError;

    /// Initialize UART0 for the console (8N1, no flow control).
    pub fn init_console_uart<'d>(
        uart: impl Peripheral<P = uart::UART0> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
        rx_pin: impl Peripheral<P = impl gpio::InputPin> + 'd,
        config: &UartConfig,
    ) -> Result<UartDriver<'d>, EspError> {
        let uart_config = uart::config::Config::default()
            .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

        UartDriver::new(
            uart,
            tx_pin,
            rx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )
    }

    /// Byte sink writing to the UART driver.
    ///
    /// Driver errors latch `FaultCode::UartError` instead of propagating;
    /// the console keeps running.
    pub struct EspUartSink<'u, 'd> {
        pub uart: &'u UartDriver<'d>,
        pub fault: &'u FaultState,
    }

    impl ByteSink for EspUartSink<'_, '_> {
        fn write_bytes(&mut self, bytes: &[u8]) {
            let mut rest = bytes;
            while !rest.is_empty() {
                match self.uart.write(rest) {
                    Ok(0) => break,
                    Ok(n) => rest = &rest[n..],
                    Err(e) => {
                        self.fault.set(FaultCode::UartError, e.code() as u32);
                        break;
                    }
                }
            }
        }
    }
}
