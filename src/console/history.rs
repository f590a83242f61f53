//! Command history with ring buffer
//!
//! Static allocation, `HISTORY_DEPTH` slots of `LINE_SIZE` bytes each.
//!
//! Navigation is tracked as a depth behind the live line rather than as a
//! raw slot index, so a full ring (where the oldest slot *is* the write
//! slot) cannot be confused with "not browsing":
//!
//! ```text
//! depth 0         live line, browse_index == write_index
//! depth 1..=count slot (write_index - depth) mod D
//! ```

use heapless::Vec;

use super::error::EditError;
use super::line_buffer::{LineBuffer, LINE_SIZE};

/// Number of history entries
pub const HISTORY_DEPTH: usize = 16;

/// A committed line and the offsets it had when committed
pub struct HistorySlot {
    data: Vec<u8, LINE_SIZE>,
    saved_cursor: usize,
}

impl HistorySlot {
    /// Unused slot
    pub const EMPTY: Self = Self {
        data: Vec::new(),
        saved_cursor: 0,
    };

    /// Line bytes (`saved_high_water` long)
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Cursor offset at commit time
    pub fn saved_cursor(&self) -> usize {
        self.saved_cursor
    }

    /// High-water offset at commit time
    pub fn saved_high_water(&self) -> usize {
        self.data.len()
    }
}

/// Where Down-arrow navigation landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recall {
    /// A stored slot, by index
    Slot(usize),
    /// Back past the newest entry, to a blank live line
    Live,
}

/// Command history ring buffer
pub struct History<const D: usize = HISTORY_DEPTH> {
    /// Ring buffer of committed lines
    slots: [HistorySlot; D],
    /// Write index (next slot to overwrite)
    write_idx: usize,
    /// Number of valid entries, saturates at D
    count: usize,
    /// Steps behind the live line (0 = not browsing)
    depth: usize,
}

impl<const D: usize> History<D> {
    /// Create empty history
    pub const fn new() -> Self {
        assert!(D > 0, "History depth must be non-zero");

        Self {
            slots: [HistorySlot::EMPTY; D],
            write_idx: 0,
            count: 0,
            depth: 0,
        }
    }

    /// Snapshot a non-empty working buffer into the write slot
    ///
    /// Returns the index of the slot written.
    pub fn commit(&mut self, line: &LineBuffer) -> Result<usize, EditError> {
        if line.is_empty() {
            return Err(EditError::EmptyCommit);
        }

        let slot = &mut self.slots[self.write_idx];
        slot.data.clear();
        // high_water < LINE_SIZE, always fits
        slot.data
            .extend_from_slice(line.as_bytes())
            .map_err(|()| EditError::BufferFull)?;
        slot.saved_cursor = line.cursor();

        let committed = self.write_idx;
        self.write_idx = (self.write_idx + 1) % D;
        self.count = (self.count + 1).min(D);
        self.depth = 0; // Next Up recalls this line first
        Ok(committed)
    }

    /// Step to the next older entry
    pub fn recall_older(&mut self) -> Result<usize, EditError> {
        if self.depth >= self.count {
            return Err(EditError::HistoryExhausted);
        }
        self.depth += 1;
        Ok(self.browse_index())
    }

    /// Step toward the live line
    pub fn recall_newer(&mut self) -> Result<Recall, EditError> {
        match self.depth {
            0 => Err(EditError::HistoryExhausted),
            1 => {
                self.depth = 0;
                Ok(Recall::Live)
            }
            _ => {
                self.depth -= 1;
                Ok(Recall::Slot(self.browse_index()))
            }
        }
    }

    /// Copy a slot into the working buffer, restoring its offsets
    pub fn load(&self, idx: usize, line: &mut LineBuffer) -> Result<(), EditError> {
        let slot = self.slots.get(idx).ok_or(EditError::HistoryExhausted)?;
        line.load(slot.as_bytes(), slot.saved_cursor);
        Ok(())
    }

    /// Leave browsing mode (call when the working buffer is cleared)
    pub fn reset_browse(&mut self) {
        self.depth = 0;
    }

    /// Slot shown while browsing, `write_index()` otherwise
    pub fn browse_index(&self) -> usize {
        (self.write_idx + D - self.depth) % D
    }

    /// Next slot to be overwritten
    pub fn write_index(&self) -> usize {
        self.write_idx
    }

    /// True while Up/Down navigation is away from the live line
    pub fn is_browsing(&self) -> bool {
        self.depth != 0
    }

    /// Get a slot by ring index
    pub fn slot(&self, idx: usize) -> Option<&HistorySlot> {
        self.slots.get(idx)
    }

    /// Committed line bytes of a slot (empty if out of range)
    pub fn line(&self, idx: usize) -> &[u8] {
        self.slots.get(idx).map(HistorySlot::as_bytes).unwrap_or(&[])
    }

    /// Entry by age (0 = newest)
    pub fn get(&self, age: usize) -> Option<&[u8]> {
        if age >= self.count {
            return None;
        }
        // write_idx points to next write slot, so newest is at write_idx - 1
        let idx = (self.write_idx + D - 1 - age) % D;
        Some(self.slots[idx].as_bytes())
    }

    /// Number of valid entries
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if nothing was ever committed
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Ring depth
    pub const fn capacity(&self) -> usize {
        D
    }
}

impl<const D: usize> Default for History<D> {
    fn default() -> Self {
        Self::new()
    }
}
