//! Chunked upload engine.
//!
//! Each registered file gets a [`ChunkScheduler`]: an explicit state machine
//! that sends the file one block at a time, never submitting the next block
//! before the previous response has arrived. [`UploadEngine`] owns the
//! schedulers, assigns each file a stable index, and runs every file's chain
//! as its own tokio task so files progress independently.
//!
//! # Lifecycle
//!
//! `Idle → InFlight → (InFlight …) → Completed | Failed | Aborted`
//!
//! Progress and failures reach the caller only through the callbacks in
//! [`EngineConfig`]; [`UploadEngine::join`] reports a chain's terminal state.

pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod scheduler;

pub use config::{BlockSizeFn, EngineConfig, FileCallback, FilenameEncoder};
pub use engine::UploadEngine;
pub use entry::{FileEntry, FileState};
pub use error::EngineError;
pub use scheduler::{ChunkScheduler, PendingChunk};
