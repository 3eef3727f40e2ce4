//! Engine error types.

/// Errors from engine bookkeeping operations.
///
/// Chunk failures are never reported here; they go to the error callback.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown file index {0}")]
    UnknownFile(usize),

    #[error("file {0} was already joined")]
    AlreadyJoined(usize),

    #[error("no tokio runtime to run the upload on")]
    NoRuntime,

    #[error("upload task for file {index} did not finish: {source}")]
    Task {
        index: usize,
        #[source]
        source: tokio::task::JoinError,
    },
}
