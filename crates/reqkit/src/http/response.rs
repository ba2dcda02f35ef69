//! Response handles and buffered materialization.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use super::config::RequestOptions;
use super::result::HttpResult;
use crate::error::{HttpError, Result};

/// Buffer the whole body and fold it into a result.
///
/// Consuming the response here releases the body on every path, including
/// read failures. Field ordering mirrors the call contract: status first,
/// then raw-body capture, headers, classification, decode.
pub(crate) async fn materialize<T, F>(
    response: reqwest::Response,
    options: &RequestOptions,
    decode: F,
) -> HttpResult<T>
where
    F: FnOnce(&Bytes) -> Result<T>,
{
    let status = response.status().as_u16();
    let headers = response.headers().clone();

    let data = match response.bytes().await {
        Ok(data) => data,
        Err(e) => {
            return HttpResult::status_error(status, HttpError::BodyRead(e.to_string()));
        }
    };

    let raw_body = if options.raw_body {
        data.clone()
    } else {
        Bytes::new()
    };

    if !options.is_success_status(status) {
        let body = String::from_utf8_lossy(&data).into_owned();
        return HttpResult::buffered_error(
            status,
            headers,
            raw_body,
            HttpError::Status { status, body },
        );
    }

    match decode(&data) {
        Ok(value) => HttpResult::buffered(status, headers, raw_body, value),
        Err(e) => HttpResult::buffered_error(status, headers, raw_body, e),
    }
}

/// The raw transport response with its body unread.
///
/// Returned by [`HttpCall::send`](super::call::HttpCall::send). Ownership
/// of the body transfers to the caller: read it with one of the consuming
/// methods, or drop the handle to release it.
pub struct RawResponse {
    inner: reqwest::Response,
}

impl RawResponse {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// The response headers.
    pub fn headers(&self) -> &http::HeaderMap {
        self.inner.headers()
    }

    /// A single header value, if present and valid UTF-8.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.inner
            .headers()
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// The Content-Type header value.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// The Content-Length header value.
    pub fn content_length(&self) -> Option<u64> {
        self.inner.content_length()
    }

    /// The final URL after any redirects.
    pub fn url(&self) -> &str {
        self.inner.url().as_str()
    }

    /// Read the full body as text.
    pub async fn text(self) -> Result<String> {
        self.inner
            .text()
            .await
            .map_err(|e| HttpError::BodyRead(e.to_string()))
    }

    /// Read the full body as bytes.
    pub async fn bytes(self) -> Result<Bytes> {
        self.inner
            .bytes()
            .await
            .map_err(|e| HttpError::BodyRead(e.to_string()))
    }

    /// Read and decode the full body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let data = self.bytes().await?;
        serde_json::from_slice(&data).map_err(HttpError::from)
    }

    /// Turn the handle into a chunked body stream.
    pub fn into_stream(self) -> BodyStream {
        BodyStream::new(self.inner)
    }
}

impl std::fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status())
            .field("url", &self.url())
            .finish()
    }
}

/// An unread, chunked response body.
///
/// Returned by
/// [`HttpCall::stream_response`](super::call::HttpCall::stream_response);
/// dropping it releases the connection.
pub struct BodyStream {
    inner: reqwest::Response,
    total_size: Option<u64>,
    bytes_received: u64,
}

impl BodyStream {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        let total_size = inner.content_length();
        Self {
            inner,
            total_size,
            bytes_received: 0,
        }
    }

    /// The total body size, if the transport knows it.
    pub fn total_size(&self) -> Option<u64> {
        self.total_size
    }

    /// Bytes received so far.
    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    /// Read the next chunk of data.
    ///
    /// Returns `None` when the stream is complete.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        match self.inner.chunk().await {
            Ok(Some(chunk)) => {
                self.bytes_received += chunk.len() as u64;
                Ok(Some(chunk))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(HttpError::BodyRead(e.to_string())),
        }
    }

    /// Collect all remaining chunks into a single buffer.
    pub async fn collect(mut self) -> Result<Bytes> {
        let mut buffer = Vec::new();
        while let Some(chunk) = self.next_chunk().await? {
            buffer.extend_from_slice(&chunk);
        }
        Ok(Bytes::from(buffer))
    }
}

impl std::fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyStream")
            .field("total_size", &self.total_size)
            .field("bytes_received", &self.bytes_received)
            .finish()
    }
}
