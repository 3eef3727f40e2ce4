use crate::chunked::next_chunk_size;
use crate::progress::progress_percent;

/// Placement of one chunk within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Byte offset of the first byte in the chunk.
    pub start: u64,
    /// Size of the chunk in bytes (never 0).
    pub size: u64,
    /// Percent complete once this chunk is accepted.
    pub progress: u8,
}

impl ChunkPlan {
    /// Plans the chunk starting at `cursor`, or `None` once the file is exhausted.
    pub fn at(cursor: u64, block_size: u64, total: u64) -> Option<Self> {
        let size = next_chunk_size(cursor, block_size, total);
        if size == 0 {
            return None;
        }
        Some(Self {
            start: cursor,
            size,
            progress: progress_percent(cursor + size, total),
        })
    }

    /// Offset one past the last byte of the chunk.
    pub fn end(&self) -> u64 {
        self.start + self.size
    }
}
