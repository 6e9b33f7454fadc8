//! Bulk transfer primitives between device memory and caller memory.
//!
//! A transfer may move fewer bytes than asked for. That is a normal outcome
//! (the caller's region was shorter, or the primitive works in chunks), and
//! the device reports it as a smaller byte count rather than an error.

/// Moves bytes across the device boundary.
///
/// Implementations must never move more than `min(dst.len(), src.len())`
/// bytes and must return the exact count moved.
pub trait Transfer: Send {
    /// Copies from device memory `src` into caller memory `dst`.
    fn copy_out(&mut self, dst: &mut [u8], src: &[u8]) -> usize;

    /// Copies from caller memory `src` into device memory `dst`.
    fn copy_in(&mut self, dst: &mut [u8], src: &[u8]) -> usize;
}

/// Copies as much as both slices allow in one go.
#[derive(Debug, Clone, Copy, Default)]
pub struct SliceCopy;

impl Transfer for SliceCopy {
    fn copy_out(&mut self, dst: &mut [u8], src: &[u8]) -> usize {
        copy_prefix(dst, src, usize::MAX)
    }

    fn copy_in(&mut self, dst: &mut [u8], src: &[u8]) -> usize {
        copy_prefix(dst, src, usize::MAX)
    }
}

/// Moves at most `chunk` bytes per call.
///
/// Models a copy primitive that stops short, so callers have to loop until
/// they see a zero count.
#[derive(Debug, Clone, Copy)]
pub struct ChunkedCopy {
    chunk: usize,
}

impl ChunkedCopy {
    /// Creates a primitive moving at most `chunk` bytes per call.
    pub fn new(chunk: usize) -> Self {
        Self { chunk }
    }

    /// Returns the per-call limit.
    pub fn chunk(&self) -> usize {
        self.chunk
    }
}

impl Transfer for ChunkedCopy {
    fn copy_out(&mut self, dst: &mut [u8], src: &[u8]) -> usize {
        copy_prefix(dst, src, self.chunk)
    }

    fn copy_in(&mut self, dst: &mut [u8], src: &[u8]) -> usize {
        copy_prefix(dst, src, self.chunk)
    }
}

fn copy_prefix(dst: &mut [u8], src: &[u8], limit: usize) -> usize {
    let n = dst.len().min(src.len()).min(limit);
    dst[..n].copy_from_slice(&src[..n]);
    n
}
