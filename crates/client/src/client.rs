//! The transport trait.

use std::future::Future;
use std::pin::Pin;

use chunkup_transfer::ByteRange;

use crate::error::ClientError;
use crate::types::UploadResponse;

/// Boxed future returned by [`TransferClient::send`].
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<UploadResponse, ClientError>> + Send + 'a>>;

/// Sends one chunk to the server.
///
/// Implementations must transmit exactly the bytes in `range`, unmodified,
/// and must not retry on their own: every failure is reported to the
/// scheduler, which ends the file's chain. Using a trait keeps scheduling
/// testable with in-memory mocks.
pub trait TransferClient: Send + Sync {
    /// Sends `range` to `url` and waits for the server's response.
    fn send(&self, url: &str, range: ByteRange) -> SendFuture<'_>;
}
