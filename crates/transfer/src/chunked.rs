use std::fmt;

use bytes::Bytes;

use crate::{DEFAULT_BLOCK_COUNT, TransferError};

// ---------------------------------------------------------------------------
// Block sizing
// ---------------------------------------------------------------------------

/// Default block-size strategy: one tenth of the file, truncated.
///
/// Yields 0 for files shorter than [`DEFAULT_BLOCK_COUNT`] bytes; callers
/// pass the result through [`clamp_block_size`].
pub fn default_block_size(total: u64) -> u64 {
    total / DEFAULT_BLOCK_COUNT
}

/// Clamps a strategy result into `1..=total`.
///
/// A zero or oversized block means the whole file goes out as one chunk.
/// Returns 0 only for an empty file.
pub fn clamp_block_size(requested: u64, total: u64) -> u64 {
    if requested == 0 || requested > total {
        total
    } else {
        requested
    }
}

/// Size of the chunk starting at `cursor`: the block size, shrunk for the
/// final short chunk. Returns 0 once `cursor` has reached `total`.
pub fn next_chunk_size(cursor: u64, block_size: u64, total: u64) -> u64 {
    block_size.min(total.saturating_sub(cursor))
}

// ---------------------------------------------------------------------------
// ByteRange
// ---------------------------------------------------------------------------

/// A window `[offset, offset + len)` into a shared, immutable buffer.
///
/// Cloning is cheap (reference-counted buffer). The window's bytes are
/// handed to the transport as-is; no text encoding is ever applied.
#[derive(Clone, PartialEq, Eq)]
pub struct ByteRange {
    buffer: Bytes,
    offset: usize,
    len: usize,
}

impl ByteRange {
    /// Creates a view of `len` bytes starting at `offset`.
    pub fn new(buffer: Bytes, offset: u64, len: u64) -> Result<Self, TransferError> {
        let out_of_bounds = || TransferError::RangeOutOfBounds {
            offset,
            len,
            buffer_len: buffer.len(),
        };
        let start = usize::try_from(offset).map_err(|_| out_of_bounds())?;
        let size = usize::try_from(len).map_err(|_| out_of_bounds())?;
        match start.checked_add(size) {
            Some(end) if end <= buffer.len() => Ok(Self {
                buffer,
                offset: start,
                len: size,
            }),
            _ => Err(out_of_bounds()),
        }
    }

    /// Byte offset of the window within the buffer.
    pub fn offset(&self) -> u64 {
        self.offset as u64
    }

    /// Length of the window in bytes.
    pub fn len(&self) -> u64 {
        self.len as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset one past the last byte of the window.
    pub fn end(&self) -> u64 {
        (self.offset + self.len) as u64
    }

    /// Borrows the window's bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[self.offset..self.offset + self.len]
    }

    /// Returns the window as an owned `Bytes` sharing the underlying buffer.
    pub fn to_bytes(&self) -> Bytes {
        self.buffer.slice(self.offset..self.offset + self.len)
    }
}

impl fmt::Debug for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteRange")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("buffer_len", &self.buffer.len())
            .finish()
    }
}
