//! # RustUartShell
//!
//! Interactive serial console for lab boards: line editing with cursor
//! movement, a fixed-depth command history, and a small command set for
//! runtime parameters.
//!
//! ## Architecture
//!
//! Bytes flow through lock-free SPSC queues; no callbacks, no mutexes:
//! - RX interrupt pushes into the RX [`ByteQueue`] (via [`hal::RxChannel`])
//! - Main loop feeds the [`console::Console`], which echoes into the TX queue
//! - Committed lines go to the [`console::Interpreter`]
//! - Each context logs into its own [`LogStream`], drained by the main loop

#![cfg_attr(not(test), no_std)]

pub mod byte_queue;
pub mod config;
pub mod console;
pub mod fault;
pub mod hal;
pub mod log_globals;
pub mod logging;
pub mod uart_logger;

pub use byte_queue::{ByteQueue, RX_QUEUE_SIZE, TX_QUEUE_SIZE};
pub use config::CONFIG;
pub use fault::{FaultCode, FaultState};
pub use log_globals::{CONSOLE_LOG_STREAM, RX_LOG_STREAM};
pub use logging::LogStream;
pub use uart_logger::LogDrain;
