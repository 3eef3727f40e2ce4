//! Transport for chunk uploads.
//!
//! [`TransferClient`] is the seam between the scheduler and the network:
//! one call sends one byte range and yields the server's verdict.
//! [`HttpTransferClient`] implements it with `reqwest`, posting each chunk
//! as a raw `application/octet-stream` body.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{SendFuture, TransferClient};
pub use error::ClientError;
pub use http::{HttpClientOptions, HttpTransferClient};
pub use types::{ChunkOutcome, UploadResponse};

use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Content type declared for every chunk body.
pub const CHUNK_CONTENT_TYPE: &str = "application/octet-stream";
