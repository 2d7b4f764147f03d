//! Fixed-capacity lap ring buffer with independent write and review cursors.

use crate::types::Ticks;
use heapless::Vec;

/// Number of lap slots. Not configurable.
pub const LAP_CAPACITY: usize = 5;

/// A lap: ticks between two consecutive lap records.
///
/// Signed because a reset clears the elapsed time but not the previous
/// record point, so the first lap after a reset can be negative.
pub type LapRecord = i32;

/// Ring buffer of the last [`LAP_CAPACITY`] laps.
///
/// Writes advance a write cursor modulo the capacity and silently overwrite
/// the oldest slot once full. A separate review cursor selects the slot
/// shown in review mode; it only moves forward and wraps.
#[derive(Debug, Clone, Default)]
pub struct LapStore {
    slots: Vec<LapRecord, LAP_CAPACITY>,
    write_index: usize,
    review_index: usize,
    previous_recorded: Ticks,
}

impl LapStore {
    /// Creates an empty store with both cursors at slot 0.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            write_index: 0,
            review_index: 0,
            previous_recorded: 0,
        }
    }

    /// Records a lap ending at `current` and returns its delta.
    ///
    /// The delta is measured from the previous record point (0 initially).
    /// The write cursor advances and `current` becomes the new record point.
    pub fn record_lap(&mut self, current: Ticks) -> LapRecord {
        let delta = current.wrapping_sub(self.previous_recorded) as LapRecord;

        // Until the buffer fills, the write cursor always equals the length,
        // so the push only hands the delta back once every slot is written.
        if let Err(delta) = self.slots.push(delta) {
            if let Some(slot) = self.slots.get_mut(self.write_index) {
                *slot = delta;
            }
        }

        debug!("lap {} recorded: {} ticks", self.write_index, delta);

        self.write_index = (self.write_index + 1) % LAP_CAPACITY;
        self.previous_recorded = current;
        delta
    }

    /// Returns the lap stored at `index` (taken modulo the capacity).
    ///
    /// Slots never written read as 0.
    pub fn read_lap(&self, index: usize) -> LapRecord {
        self.lap(index).unwrap_or(0)
    }

    /// Returns the lap stored at `index`, or `None` if that slot was never written.
    pub fn lap(&self, index: usize) -> Option<LapRecord> {
        self.slots.get(index % LAP_CAPACITY).copied()
    }

    /// Returns the lap under the review cursor.
    pub fn reviewed_lap(&self) -> LapRecord {
        self.read_lap(self.review_index)
    }

    /// Moves the review cursor to the next slot, wrapping after the last one.
    ///
    /// Returns the new review index.
    pub fn advance_review(&mut self) -> usize {
        self.review_index = (self.review_index + 1) % LAP_CAPACITY;
        self.review_index
    }

    /// Moves the review cursor back to slot 0.
    pub fn reset_review_cursor(&mut self) {
        self.review_index = 0;
    }

    /// Slot the next lap will be written to.
    #[inline]
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Slot currently selected for review.
    #[inline]
    pub fn review_index(&self) -> usize {
        self.review_index
    }

    /// Number of slots holding a recorded lap.
    #[inline]
    pub fn recorded_count(&self) -> usize {
        self.slots.len()
    }

    /// Elapsed ticks at the last lap record.
    #[inline]
    pub fn previous_recorded(&self) -> Ticks {
        self.previous_recorded
    }
}
