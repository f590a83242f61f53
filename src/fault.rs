//! Transport fault state for RustUartShell.
//!
//! Editing mistakes are not faults: the line editor absorbs them. A fault
//! here means bytes were lost between the wire and the editor (or back),
//! so the remote terminal and the internal line may no longer agree.
//! The main loop reports it and redraws.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Fault codes indicating what went wrong on the serial link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// RX queue full: main loop fell behind, received bytes were dropped.
    RxOverrun = 1,

    /// TX queue full: echo or command output was dropped.
    TxOverrun = 2,

    /// UART driver returned an error.
    UartError = 3,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::RxOverrun,
            2 => FaultCode::TxOverrun,
            3 => FaultCode::UartError,
            _ => FaultCode::None,
        }
    }

    /// Short name for log output.
    pub fn as_str(self) -> &'static str {
        match self {
            FaultCode::None => "none",
            FaultCode::RxOverrun => "rx-overrun",
            FaultCode::TxOverrun => "tx-overrun",
            FaultCode::UartError => "uart-error",
        }
    }
}

/// Thread-safe fault state.
///
/// Set from interrupt context or the UART writer, checked by the main loop.
///
/// # Usage
///
/// ```ignore
/// static FAULT: FaultState = FaultState::new();
///
/// // In RX interrupt:
/// if !RX_QUEUE.push(byte) {
///     FAULT.set(FaultCode::RxOverrun, RX_QUEUE.dropped());
/// }
///
/// // In main loop:
/// if FAULT.is_active() {
///     report(FAULT.snapshot());
///     FAULT.clear();
/// }
/// ```
pub struct FaultState {
    /// True if fault is active.
    active: AtomicBool,

    /// Fault code (reason for fault).
    code: AtomicU8,

    /// Additional data (e.g., dropped byte count, driver error code).
    data: AtomicU32,

    /// Total fault count since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Set fault state.
    ///
    /// Atomically marks the fault active with the given code and data.
    /// Increments the fault counter.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Check if fault is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Get fault data (meaning depends on fault code).
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Get total fault count since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Clear fault state (after reporting).
    ///
    /// Clears the active flag only; the counter is kept for diagnostics.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Get a snapshot of the current fault state.
    #[inline]
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            count: self.count(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub count: u32,
}
