//! HTTP transport.
//!
//! Async client using `reqwest`. Each chunk is one `POST` whose body is the
//! chunk's raw bytes; the response body must be JSON with a boolean `result`.

use std::time::Duration;

use chunkup_transfer::ByteRange;
use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use tracing::trace;

use crate::client::{SendFuture, TransferClient};
use crate::error::ClientError;
use crate::types::UploadResponse;
use crate::{CHUNK_CONTENT_TYPE, DEFAULT_REQUEST_TIMEOUT};

/// Options for [`HttpTransferClient`].
#[derive(Debug, Clone)]
pub struct HttpClientOptions {
    /// Base URL that relative rendered URLs are resolved against.
    pub base_url: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// `reqwest`-backed [`TransferClient`].
pub struct HttpTransferClient {
    http: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpTransferClient {
    /// Creates a client from `options`.
    pub fn new(options: HttpClientOptions) -> Result<Self, ClientError> {
        let base_url = options
            .base_url
            .as_deref()
            .map(|base| {
                Url::parse(base).map_err(|e| ClientError::InvalidUrl(format!("{base}: {e}")))
            })
            .transpose()?;

        let http = reqwest::Client::builder().timeout(options.timeout).build()?;

        Ok(Self { http, base_url })
    }

    /// Creates a client that resolves relative URLs against `base`.
    pub fn with_base_url(base: &str) -> Result<Self, ClientError> {
        Self::new(HttpClientOptions {
            base_url: Some(base.to_string()),
            ..Default::default()
        })
    }

    /// Resolves a rendered URL the way a browser resolves a link against the
    /// page location. Absolute URLs pass through unchanged.
    fn resolve(&self, url: &str) -> Result<Url, ClientError> {
        let resolved = match &self.base_url {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };
        resolved.map_err(|e| ClientError::InvalidUrl(format!("{url}: {e}")))
    }

    async fn post_chunk(&self, url: &str, range: ByteRange) -> Result<UploadResponse, ClientError> {
        let target = self.resolve(url)?;
        trace!(url = %target, offset = range.offset(), len = range.len(), "posting chunk");

        let resp = self
            .http
            .post(target)
            .header(CONTENT_TYPE, HeaderValue::from_static(CHUNK_CONTENT_TYPE))
            .body(range.to_bytes())
            .send()
            .await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl TransferClient for HttpTransferClient {
    fn send(&self, url: &str, range: ByteRange) -> SendFuture<'_> {
        let url = url.to_string();
        Box::pin(async move { self.post_chunk(&url, range).await })
    }
}
