//! Per-file chunk state machine.
//!
//! The scheduler is driven in two halves so every transition is observable:
//! [`ChunkScheduler::next_chunk`] plans and claims the next block, and
//! [`ChunkScheduler::complete_chunk`] applies the server's verdict.
//! [`ChunkScheduler::run`] wires the two together over a [`TransferClient`].

use std::sync::Arc;

use chunkup_client::{ChunkOutcome, TransferClient};
use chunkup_transfer::{ByteRange, ChunkPlan, clamp_block_size};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::entry::{FileEntry, FileState};

/// A chunk claimed by [`ChunkScheduler::next_chunk`] and awaiting its response.
#[derive(Debug, Clone)]
pub struct PendingChunk {
    pub start: u64,
    pub size: u64,
    /// Percent complete once this chunk is accepted; also sent in the URL.
    pub progress: u8,
    /// Rendered request URL.
    pub url: String,
    pub range: ByteRange,
}

impl PendingChunk {
    pub fn end(&self) -> u64 {
        self.start + self.size
    }
}

/// Sequential uploader for a single file.
pub struct ChunkScheduler {
    entry: FileEntry,
    config: Arc<EngineConfig>,
    /// Start offset of the chunk currently awaiting a response.
    outstanding: Option<u64>,
    /// Name as it appears in request URLs.
    url_name: String,
}

impl ChunkScheduler {
    /// Creates a scheduler and fixes the file's block size from the strategy.
    pub fn new(mut entry: FileEntry, config: Arc<EngineConfig>) -> Self {
        let total = entry.total_len();
        entry.block_size = clamp_block_size((config.on_blocksize)(total), total);
        let url_name = (config.encode_filename)(entry.name());
        Self {
            entry,
            config,
            outstanding: None,
            url_name,
        }
    }

    pub fn entry(&self) -> &FileEntry {
        &self.entry
    }

    pub fn state(&self) -> FileState {
        self.entry.state
    }

    /// Claims the next chunk and moves to `InFlight`.
    ///
    /// Returns `None` when a chunk is already outstanding or the chain is
    /// over. An empty file completes here without any request.
    pub fn next_chunk(&mut self) -> Option<PendingChunk> {
        if self.entry.state.is_terminal() || self.outstanding.is_some() {
            return None;
        }

        let total = self.entry.total_len();
        if total == 0 {
            self.entry.state = FileState::Completed;
            debug!(index = self.entry.index(), file = %self.entry.name(), "empty file, nothing to send");
            (self.config.on_progress)(self.entry.index(), 100, self.entry.name());
            return None;
        }

        let plan = ChunkPlan::at(self.entry.cursor, self.entry.block_size, total)?;
        let url = self.config.url.render(&self.url_name, plan.progress);
        let range = match ByteRange::new(self.entry.bytes().clone(), plan.start, plan.size) {
            Ok(range) => range,
            Err(e) => {
                warn!(index = self.entry.index(), error = %e, "cannot slice chunk");
                self.fail(plan.progress);
                return None;
            }
        };

        self.entry.state = FileState::InFlight;
        self.outstanding = Some(plan.start);

        Some(PendingChunk {
            start: plan.start,
            size: plan.size,
            progress: plan.progress,
            url,
            range,
        })
    }

    /// Applies the response for `chunk` and returns the resulting state.
    ///
    /// Responses for a chunk that is not the outstanding one (for example
    /// after [`abort`](Self::abort)) are ignored without callbacks.
    pub fn complete_chunk(&mut self, chunk: &PendingChunk, outcome: ChunkOutcome) -> FileState {
        if self.entry.state != FileState::InFlight || self.outstanding != Some(chunk.start) {
            debug!(
                index = self.entry.index(),
                start = chunk.start,
                state = ?self.entry.state,
                "ignoring response for chunk not in flight"
            );
            return self.entry.state;
        }
        self.outstanding = None;

        match outcome {
            ChunkOutcome::Success => {
                self.entry.cursor = chunk.end();
                (self.config.on_progress)(self.entry.index(), chunk.progress, self.entry.name());
                if self.entry.cursor >= self.entry.total_len() {
                    self.entry.state = FileState::Completed;
                    info!(
                        index = self.entry.index(),
                        file = %self.entry.name(),
                        bytes = self.entry.total_len(),
                        "upload completed"
                    );
                }
            }
            ChunkOutcome::ServerRejected => {
                warn!(
                    index = self.entry.index(),
                    file = %self.entry.name(),
                    start = chunk.start,
                    progress = chunk.progress,
                    "server rejected chunk"
                );
                self.fail(chunk.progress);
            }
            ChunkOutcome::TransportFailure(e) => {
                warn!(
                    index = self.entry.index(),
                    file = %self.entry.name(),
                    start = chunk.start,
                    progress = chunk.progress,
                    error = %e,
                    "chunk transport failed"
                );
                self.fail(chunk.progress);
            }
        }

        self.entry.state
    }

    /// Moves a live chain to `Aborted`. Returns `false` if it had already ended.
    pub fn abort(&mut self) -> bool {
        if self.entry.state.is_terminal() {
            return false;
        }
        self.entry.state = FileState::Aborted;
        self.outstanding = None;
        debug!(index = self.entry.index(), cursor = self.entry.cursor, "upload aborted");
        true
    }

    /// Drives the chain to a terminal state.
    ///
    /// Cancelling `cancel` while a chunk is in flight drops that request;
    /// its response, if any, is never observed.
    pub async fn run(mut self, client: Arc<dyn TransferClient>, cancel: CancellationToken) -> FileState {
        loop {
            if cancel.is_cancelled() {
                self.abort();
                break;
            }
            let Some(chunk) = self.next_chunk() else {
                break;
            };

            debug!(
                index = self.entry.index(),
                start = chunk.start,
                size = chunk.size,
                progress = chunk.progress,
                "sending chunk"
            );

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.abort();
                    break;
                }
                result = client.send(&chunk.url, chunk.range.clone()) => result,
            };

            self.complete_chunk(&chunk, ChunkOutcome::from_result(result));
        }

        self.entry.state
    }

    fn fail(&mut self, progress: u8) {
        self.entry.state = FileState::Failed;
        self.outstanding = None;
        (self.config.on_error)(self.entry.index(), progress, self.entry.name());
    }
}
