//! Engine configuration.

use std::fmt;
use std::sync::Arc;

use chunkup_transfer::{UrlTemplate, default_block_size};

/// Block-size strategy: total file length in bytes → nominal block size.
pub type BlockSizeFn = Arc<dyn Fn(u64) -> u64 + Send + Sync>;

/// Per-file notification: `(index, percent, name)`.
pub type FileCallback = Arc<dyn Fn(usize, u8, &str) + Send + Sync>;

/// Maps a display name to the text substituted for `{filename}`.
pub type FilenameEncoder = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Immutable configuration shared by every chain of an engine.
#[derive(Clone)]
pub struct EngineConfig {
    pub url: UrlTemplate,
    pub(crate) on_blocksize: BlockSizeFn,
    pub(crate) on_progress: FileCallback,
    pub(crate) on_error: FileCallback,
    pub(crate) encode_filename: FilenameEncoder,
    custom_callbacks: [bool; 4],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: UrlTemplate::default(),
            on_blocksize: Arc::new(default_block_size),
            on_progress: Arc::new(|_: usize, _: u8, _: &str| {}),
            on_error: Arc::new(|_: usize, _: u8, _: &str| {}),
            encode_filename: Arc::new(|name: &str| name.to_string()),
            custom_callbacks: [false; 4],
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<UrlTemplate>) -> Self {
        self.url = url.into();
        self
    }

    /// Overrides the block-size strategy.
    ///
    /// The result is clamped per file: 0 or anything above the file length
    /// sends the file as a single chunk.
    pub fn on_blocksize<F>(mut self, strategy: F) -> Self
    where
        F: Fn(u64) -> u64 + Send + Sync + 'static,
    {
        self.on_blocksize = Arc::new(strategy);
        self.custom_callbacks[0] = true;
        self
    }

    /// Called after every accepted chunk with the percent it completed.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, u8, &str) + Send + Sync + 'static,
    {
        self.on_progress = Arc::new(callback);
        self.custom_callbacks[1] = true;
        self
    }

    /// Called at most once per file, when a chunk fails.
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, u8, &str) + Send + Sync + 'static,
    {
        self.on_error = Arc::new(callback);
        self.custom_callbacks[2] = true;
        self
    }

    /// Transforms the name before it is placed in the request URL.
    ///
    /// The default inserts the name verbatim. Callbacks always receive the
    /// registered name.
    pub fn filename_encoder<F>(mut self, encode: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.encode_filename = Arc::new(encode);
        self.custom_callbacks[3] = true;
        self
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("url", &self.url)
            .field("on_blocksize", &self.custom_callbacks[0])
            .field("on_progress", &self.custom_callbacks[1])
            .field("on_error", &self.custom_callbacks[2])
            .field("filename_encoder", &self.custom_callbacks[3])
            .finish()
    }
}
