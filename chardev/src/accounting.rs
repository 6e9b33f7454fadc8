//! Open/close counters.

use serde::Serialize;

/// Counts `open()` and `close()` calls over the life of a device.
///
/// Both counters are `u64` and wrap to zero after `u64::MAX`. They are never
/// reset and are unaffected by reads and writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionAccounting {
    opens: u64,
    closes: u64,
}

impl SessionAccounting {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn starting_at(opens: u64, closes: u64) -> Self {
        Self { opens, closes }
    }

    /// Records an open and returns the new open count.
    pub fn record_open(&mut self) -> u64 {
        self.opens = self.opens.wrapping_add(1);
        self.opens
    }

    /// Records a close and returns the new close count.
    pub fn record_close(&mut self) -> u64 {
        self.closes = self.closes.wrapping_add(1);
        self.closes
    }

    /// Returns the number of opens so far.
    pub fn opens(&self) -> u64 {
        self.opens
    }

    /// Returns the number of closes so far.
    pub fn closes(&self) -> u64 {
        self.closes
    }
}
