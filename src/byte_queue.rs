//! Lock-free SPSC (Single Producer, Single Consumer) byte queue.
//!
//! Carries bytes across the interrupt boundary in each direction:
//!
//! ```text
//! UART RX ISR ──▶ RX queue ──▶ main loop (Console)
//! Console     ──▶ TX queue ──▶ UART writer
//! ```
//!
//! # Rules
//!
//! - Exactly one producer and one consumer per queue
//! - Push never blocks: if the ring is full the byte is dropped and counted
//! - Only atomic operations for synchronization

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::hal::uart::ByteSink;

/// Receive queue size. Covers several pasted lines between main-loop polls.
pub const RX_QUEUE_SIZE: usize = 256;

/// Transmit queue size. A full history redraw plus command output fits.
pub const TX_QUEUE_SIZE: usize = 1024;

/// Lock-free SPSC ring of bytes.
///
/// # Memory Ordering
///
/// - Producer publishes with `Release` on `write_idx`, consumer observes with `Acquire`
/// - Consumer frees slots with `Release` on `read_idx`, producer observes with `Acquire`
pub struct ByteQueue<const N: usize> {
    slots: UnsafeCell<[u8; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: Single producer, single consumer, atomic coordination.
// A slot is only written while it is outside [read, write) and only read
// while inside it.
unsafe impl<const N: usize> Sync for ByteQueue<N> {}
unsafe impl<const N: usize> Send for ByteQueue<N> {}

impl<const N: usize> ByteQueue<N> {
    const MASK: usize = N - 1;

    /// Create a new empty queue.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Queue size must be power of 2");

        Self {
            slots: UnsafeCell::new([0u8; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a byte (producer side, never blocks).
    ///
    /// Returns `false` if the byte was dropped (ring full).
    #[inline]
    pub fn push(&self, byte: u8) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: Single producer, slot is free (outside [read, write)).
        unsafe {
            (*self.slots.get())[(write as usize) & Self::MASK] = byte;
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Push as many bytes as fit.
    ///
    /// Returns the number queued; the rest are counted as dropped.
    pub fn push_slice(&self, bytes: &[u8]) -> usize {
        let mut queued = 0;
        for &b in bytes {
            if self.push(b) {
                queued += 1;
            }
        }
        queued
    }

    /// Pop the oldest byte (consumer side).
    #[inline]
    pub fn pop(&self) -> Option<u8> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        // SAFETY: Single consumer, slot is published (inside [read, write)).
        let byte = unsafe { (*self.slots.get())[(read as usize) & Self::MASK] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(byte)
    }

    /// Move everything queued into a sink, in chunks.
    ///
    /// Returns the number of bytes moved.
    pub fn drain_to<S: ByteSink + ?Sized>(&self, sink: &mut S) -> usize {
        let mut chunk = [0u8; 32];
        let mut total = 0;

        loop {
            let mut len = 0;
            while len < chunk.len() {
                match self.pop() {
                    Some(b) => {
                        chunk[len] = b;
                        len += 1;
                    }
                    None => break,
                }
            }
            if len == 0 {
                return total;
            }
            sink.write_bytes(&chunk[..len]);
            total += len;
        }
    }

    /// Get number of bytes waiting.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    /// Check if nothing is waiting.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Get count of dropped bytes.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Get the buffer capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for ByteQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Echo and command output go straight into the TX queue.
/// Overflow is dropped and counted, the writer never waits.
impl<const N: usize> ByteSink for &ByteQueue<N> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.push_slice(bytes);
    }
}
