//! Wire types and outcome classification.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Body the server answers each chunk with.
///
/// Only `result` is read; any other fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub result: bool,
}

impl UploadResponse {
    pub fn accepted() -> Self {
        Self { result: true }
    }

    pub fn rejected() -> Self {
        Self { result: false }
    }
}

/// Classified result of one chunk request.
#[derive(Debug)]
pub enum ChunkOutcome {
    /// The server stored the chunk (`result: true`).
    Success,
    /// The server answered but declined the chunk (`result: false`).
    ServerRejected,
    /// The request failed or the response was unusable.
    TransportFailure(ClientError),
}

impl ChunkOutcome {
    pub fn from_result(result: Result<UploadResponse, ClientError>) -> Self {
        match result {
            Ok(UploadResponse { result: true }) => Self::Success,
            Ok(UploadResponse { result: false }) => Self::ServerRejected,
            Err(e) => Self::TransportFailure(e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}
