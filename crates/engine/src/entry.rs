//! Per-file upload record.

use std::fmt;

use bytes::Bytes;

/// Lifecycle of one file's chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileState {
    /// Registered, no chunk sent yet.
    Idle,
    /// A chunk is outstanding, or the next one is about to be sent.
    InFlight,
    /// Every byte was accepted.
    Completed,
    /// A chunk failed; nothing more is sent.
    Failed,
    /// Cancelled by the caller; late responses are ignored.
    Aborted,
}

impl FileState {
    /// Returns `true` once no further chunk can be sent.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Aborted)
    }
}

/// One file handed to the engine.
///
/// `cursor`, `block_size` and `state` are written only by the file's
/// [`ChunkScheduler`](crate::ChunkScheduler).
#[derive(Clone)]
pub struct FileEntry {
    index: usize,
    name: String,
    bytes: Bytes,
    pub(crate) cursor: u64,
    pub(crate) block_size: u64,
    pub(crate) state: FileState,
}

impl FileEntry {
    pub fn new(index: usize, name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            index,
            name: name.into(),
            bytes: bytes.into(),
            cursor: 0,
            block_size: 0,
            state: FileState::Idle,
        }
    }

    /// Stable ordinal used in callbacks.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn total_len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Offset of the next unsent byte.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    pub fn state(&self) -> FileState {
        self.state
    }
}

impl fmt::Debug for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileEntry")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("total_len", &self.total_len())
            .field("cursor", &self.cursor)
            .field("block_size", &self.block_size)
            .field("state", &self.state)
            .finish()
    }
}
