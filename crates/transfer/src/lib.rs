//! Chunk planning primitives for sequential block uploads.
//!
//! Everything here is pure: sizing a file into blocks, viewing a window of a
//! shared buffer, computing the percent a chunk will reach, and rendering the
//! per-chunk request URL. Transport and scheduling live in the client and
//! engine crates.

mod chunked;
mod progress;
mod template;
mod types;

pub use chunked::{ByteRange, clamp_block_size, default_block_size, next_chunk_size};
pub use progress::progress_percent;
pub use template::{FILENAME_PLACEHOLDER, PROGRESS_PLACEHOLDER, UrlTemplate};
pub use types::ChunkPlan;

/// Nominal number of blocks a file is split into by the default strategy.
pub const DEFAULT_BLOCK_COUNT: u64 = 10;

/// Default request URL template (relative to the upload endpoint).
pub const DEFAULT_URL_TEMPLATE: &str = "?filename={filename}&progress={progress}";

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("range {offset}+{len} exceeds buffer of {buffer_len} bytes")]
    RangeOutOfBounds {
        offset: u64,
        len: u64,
        buffer_len: usize,
    },
}
