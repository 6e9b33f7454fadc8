//! Cursor arithmetic for reads and writes.
//!
//! Pure functions deciding which region of the store a call may touch. They
//! never fail and never produce a region extending past the capacity.

use serde::{Deserialize, Serialize};

/// How much a read attempts to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// Attempt the whole remainder on every call, whatever the caller asked for.
    Remainder,
    /// Attempt `min(requested, remaining)`.
    #[default]
    Requested,
}

/// Where the readable region ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadExtent {
    /// Reads run to the end of the store, unwritten padding included.
    #[default]
    Capacity,
    /// Reads stop at the write cursor.
    Written,
}

/// A contiguous region of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Offset of the first byte.
    pub at: usize,
    /// Number of bytes.
    pub len: usize,
}

impl Span {
    /// Returns true if the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Plans a read from `read_offset`.
///
/// `extent` is the end of the readable region. Returns `None` when nothing
/// remains (end of data); no transfer should be attempted then.
pub fn plan_read(read_offset: usize, extent: usize, requested: usize, mode: ReadMode) -> Option<Span> {
    let remaining = unread(read_offset, extent);
    if remaining == 0 {
        return None;
    }
    let len = match mode {
        ReadMode::Remainder => remaining,
        ReadMode::Requested => requested.min(remaining),
    };
    Some(Span {
        at: read_offset,
        len,
    })
}

/// Plans a write of `length` bytes at `offset` past the write cursor.
///
/// The room left is `capacity - offset - write_cursor`; when that is zero
/// or negative the returned span is empty.
pub fn plan_write(write_cursor: usize, offset: usize, length: usize, capacity: usize) -> Span {
    let available = capacity
        .checked_sub(offset)
        .and_then(|room| room.checked_sub(write_cursor))
        .unwrap_or(0);
    Span {
        at: offset.saturating_add(write_cursor),
        len: length.min(available),
    }
}

/// Number of bytes left unread from `read_offset` to `extent`.
pub fn unread(read_offset: usize, extent: usize) -> usize {
    extent.saturating_sub(read_offset)
}
