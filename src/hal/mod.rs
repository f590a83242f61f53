//! Hardware Abstraction Layer for RustUartShell.
//!
//! Thin wrappers around the serial port.
//! Business logic stays in core modules, HAL is just I/O.

pub mod uart;

pub use uart::{ByteSink, CrlfWriter, RxChannel, UartConfig};
