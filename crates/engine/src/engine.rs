//! Multi-file upload engine.
//!
//! Owns one chain per registered file, addressed by a stable index.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use chunkup_client::TransferClient;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::entry::{FileEntry, FileState};
use crate::error::EngineError;
use crate::scheduler::ChunkScheduler;

/// Runs chunked uploads for any number of files concurrently.
///
/// Each file's chunks go out strictly one after another; different files
/// are independent tokio tasks with no ordering between them.
pub struct UploadEngine {
    config: Arc<EngineConfig>,
    client: Arc<dyn TransferClient>,
    files: Mutex<FileTable>,
}

#[derive(Default)]
struct FileTable {
    next_index: usize,
    slots: HashMap<usize, FileSlot>,
}

struct FileSlot {
    cancel: CancellationToken,
    /// Taken by [`UploadEngine::join`].
    handle: Option<JoinHandle<FileState>>,
}

impl UploadEngine {
    /// Creates an engine. The configuration is fixed for its lifetime.
    pub fn new(config: EngineConfig, client: Arc<dyn TransferClient>) -> Self {
        Self {
            config: Arc::new(config),
            client,
            files: Mutex::new(FileTable::default()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers a file and starts sending it immediately.
    ///
    /// Returns the file's index, which identifies it in every callback.
    /// Indices follow registration order and are never reused. Fails
    /// without consuming an index when called outside a tokio runtime.
    pub fn register_and_start(
        &self,
        name: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Result<usize, EngineError> {
        let runtime = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;

        let index = {
            let mut files = self.lock_files();
            let index = files.next_index;
            files.next_index += 1;
            index
        };

        // The block-size strategy is caller code; run it unlocked.
        let scheduler = ChunkScheduler::new(FileEntry::new(index, name, bytes), Arc::clone(&self.config));
        info!(
            index,
            file = %scheduler.entry().name(),
            bytes = scheduler.entry().total_len(),
            block_size = scheduler.entry().block_size(),
            "upload started"
        );

        let cancel = CancellationToken::new();
        let handle = runtime.spawn(scheduler.run(Arc::clone(&self.client), cancel.clone()));
        self.lock_files().slots.insert(
            index,
            FileSlot {
                cancel,
                handle: Some(handle),
            },
        );

        Ok(index)
    }

    /// Cancels a file's chain. Any response still in flight is ignored.
    ///
    /// Returns `true` if the chain was still running.
    pub fn abort(&self, index: usize) -> bool {
        let files = self.lock_files();
        let Some(slot) = files.slots.get(&index) else {
            return false;
        };
        let running = slot.handle.as_ref().is_some_and(|h| !h.is_finished());
        slot.cancel.cancel();
        debug!(index, running, "abort requested");
        running
    }

    /// Waits for a file's chain to reach its terminal state.
    ///
    /// Each index can be joined once.
    pub async fn join(&self, index: usize) -> Result<FileState, EngineError> {
        let handle = {
            let mut files = self.lock_files();
            let slot = files
                .slots
                .get_mut(&index)
                .ok_or(EngineError::UnknownFile(index))?;
            slot.handle.take().ok_or(EngineError::AlreadyJoined(index))?
        };

        handle
            .await
            .map_err(|source| EngineError::Task { index, source })
    }

    /// Drops the bookkeeping for a finished file.
    ///
    /// Returns `false` while the file is still running (or unknown); its
    /// index is never handed out again either way.
    pub fn forget(&self, index: usize) -> bool {
        let mut files = self.lock_files();
        let finished = match files.slots.get(&index) {
            Some(slot) => slot.handle.as_ref().is_none_or(|h| h.is_finished()),
            None => return false,
        };
        if finished {
            files.slots.remove(&index);
        }
        finished
    }

    fn lock_files(&self) -> MutexGuard<'_, FileTable> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }
}
