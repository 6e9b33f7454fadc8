//! Fixed-capacity byte storage backing the device.

use crate::transfer::Transfer;

/// A fixed-capacity byte array.
///
/// The storage is allocated once, zero-filled, and never resized. All
/// access goes through [`transfer_out`](Self::transfer_out) and
/// [`transfer_in`](Self::transfer_in), which clamp the requested region to
/// the capacity instead of overflowing it.
pub struct ByteStore {
    buf: Box<[u8]>,
}

impl ByteStore {
    /// Creates a zero-filled store of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        ByteStore {
            buf: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    /// Returns the store capacity.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the bytes in `[0, end)`, with `end` clamped to the capacity.
    pub fn prefix(&self, end: usize) -> &[u8] {
        &self.buf[..end.min(self.buf.len())]
    }

    /// Moves up to `max_bytes` starting at `src_offset` into `dst`.
    ///
    /// Returns the number of bytes the primitive actually moved.
    pub fn transfer_out(
        &self,
        src_offset: usize,
        max_bytes: usize,
        dst: &mut [u8],
        primitive: &mut dyn Transfer,
    ) -> usize {
        let src = clamp(&self.buf, src_offset, max_bytes);
        primitive.copy_out(dst, src)
    }

    /// Moves `src` into the store starting at `dst_offset`.
    ///
    /// Anything past the capacity is dropped. Returns the number of bytes the
    /// primitive actually moved.
    pub fn transfer_in(
        &mut self,
        dst_offset: usize,
        src: &[u8],
        primitive: &mut dyn Transfer,
    ) -> usize {
        let cap = self.buf.len();
        let start = dst_offset.min(cap);
        let end = start.saturating_add(src.len()).min(cap);
        primitive.copy_in(&mut self.buf[start..end], src)
    }
}

fn clamp(buf: &[u8], offset: usize, len: usize) -> &[u8] {
    let start = offset.min(buf.len());
    let end = start.saturating_add(len).min(buf.len());
    &buf[start..end]
}
