//! Working line buffer for console input
//!
//! Fixed capacity, no allocation. Tracks two offsets:
//! - `cursor`: where the next byte lands
//! - `high_water`: one past the last meaningful byte (logical end of line)
//!
//! Invariant: `0 <= cursor <= high_water < LINE_SIZE`. Writes at the cursor
//! overwrite in place; trailing bytes are never shifted.

use super::error::EditError;

/// Capacity of a line, including the slot that must stay free
pub const LINE_SIZE: usize = 64;

/// What a successful backspace removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Erased {
    /// Cursor was at the end of line, the last byte was truncated
    Tail,
    /// Cursor was inside the line, only the cursor moved
    Interior,
}

/// Line input buffer
pub struct LineBuffer {
    buf: [u8; LINE_SIZE],
    cursor: usize,
    high_water: usize,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; LINE_SIZE],
            cursor: 0,
            high_water: 0,
        }
    }

    /// Write a byte at the cursor
    pub fn insert(&mut self, c: u8) -> Result<(), EditError> {
        if self.cursor >= LINE_SIZE - 1 {
            return Err(EditError::BufferFull);
        }

        self.buf[self.cursor] = c;
        self.cursor += 1;
        if self.cursor > self.high_water {
            self.high_water = self.cursor;
        }
        Ok(())
    }

    /// Step back one byte
    pub fn backspace(&mut self) -> Result<Erased, EditError> {
        if self.cursor == 0 {
            return Err(EditError::AtBoundary);
        }

        if self.cursor == self.high_water {
            self.cursor -= 1;
            self.high_water -= 1;
            self.buf[self.high_water] = 0;
            Ok(Erased::Tail)
        } else {
            // Loaded history snapshots are not compacted
            self.cursor -= 1;
            Ok(Erased::Interior)
        }
    }

    /// Move cursor left without touching content
    pub fn shift_left(&mut self) -> Result<(), EditError> {
        if self.cursor == 0 {
            return Err(EditError::AtBoundary);
        }
        self.cursor -= 1;
        Ok(())
    }

    /// Move cursor right, up to the high-water mark
    pub fn shift_right(&mut self) -> Result<(), EditError> {
        if self.cursor == self.high_water {
            return Err(EditError::AtBoundary);
        }
        self.cursor += 1;
        Ok(())
    }

    /// Clear buffer
    ///
    /// Bytes past `high_water` are left as they are, nothing reads them.
    pub fn clear(&mut self) {
        self.cursor = 0;
        self.high_water = 0;
    }

    /// Replace contents with a snapshot
    ///
    /// `bytes` is truncated to `LINE_SIZE - 1`, `cursor` is clamped to the
    /// resulting length.
    pub fn load(&mut self, bytes: &[u8], cursor: usize) {
        let len = bytes.len().min(LINE_SIZE - 1);
        self.buf[..len].copy_from_slice(&bytes[..len]);
        self.high_water = len;
        self.cursor = cursor.min(len);
    }

    /// Cursor offset
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Logical end of line
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Get buffer length (same as `high_water`)
    pub fn len(&self) -> usize {
        self.high_water
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.high_water == 0
    }

    /// True when no further byte can be inserted at the cursor
    pub fn is_full(&self) -> bool {
        self.cursor >= LINE_SIZE - 1
    }

    /// Bytes from the cursor to the end of line
    pub fn tail(&self) -> &[u8] {
        &self.buf[self.cursor..self.high_water]
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.high_water]
    }

    /// Get buffer as string slice
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
