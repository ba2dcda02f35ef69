//! The per-call result container.

use bytes::Bytes;

use crate::error::HttpError;

/// The outcome of a single call.
///
/// By the time an `HttpResult` exists, all I/O for the call has completed
/// (except for the raw-response and stream terminals, whose value keeps the
/// body open for caller-driven consumption). Accessors never perform I/O or
/// mutation.
///
/// Exactly one of the error slot and the value slot is populated; callers
/// are expected to check [`error`](Self::error) before trusting the value.
pub struct HttpResult<T> {
    error: Option<HttpError>,
    status: u16,
    headers: Option<http::HeaderMap>,
    raw_body: Bytes,
    value: Option<T>,
}

impl<T> HttpResult<T> {
    /// A result for a call that failed before a response was received.
    pub(crate) fn from_error(error: HttpError) -> Self {
        Self {
            error: Some(error),
            status: 0,
            headers: None,
            raw_body: Bytes::new(),
            value: None,
        }
    }

    /// A result for a call that received a response but failed before the
    /// buffered fields were recorded.
    pub(crate) fn status_error(status: u16, error: HttpError) -> Self {
        Self {
            error: Some(error),
            status,
            headers: None,
            raw_body: Bytes::new(),
            value: None,
        }
    }

    /// A successful result outside the buffered path.
    pub(crate) fn with_value(status: u16, value: T) -> Self {
        Self {
            error: None,
            status,
            headers: None,
            raw_body: Bytes::new(),
            value: Some(value),
        }
    }

    /// A successful buffered result.
    pub(crate) fn buffered(
        status: u16,
        headers: http::HeaderMap,
        raw_body: Bytes,
        value: T,
    ) -> Self {
        Self {
            error: None,
            status,
            headers: Some(headers),
            raw_body,
            value: Some(value),
        }
    }

    /// A failed buffered result; status, headers, and raw body stay
    /// available for diagnosis.
    pub(crate) fn buffered_error(
        status: u16,
        headers: http::HeaderMap,
        raw_body: Bytes,
        error: HttpError,
    ) -> Self {
        Self {
            error: Some(error),
            status,
            headers: Some(headers),
            raw_body,
            value: None,
        }
    }

    /// The error recorded for this call, if any.
    pub fn error(&self) -> Option<&HttpError> {
        self.error.as_ref()
    }

    /// Whether the call completed without an error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The HTTP status code; 0 when no response was received.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The response headers. Present only when the body was consumed
    /// through the buffered path.
    pub fn headers(&self) -> Option<&http::HeaderMap> {
        self.headers.as_ref()
    }

    /// The raw response bytes. Empty unless raw-body capture was requested
    /// and the buffered path ran.
    pub fn raw_body(&self) -> &[u8] {
        &self.raw_body
    }

    /// The materialized value, when the call succeeded.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Consume the result, yielding the materialized value.
    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// Consume the result, yielding a standard `Result`.
    pub fn into_result(self) -> Result<T, HttpError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self
                .value
                .expect("a result without an error carries a value")),
        }
    }
}

impl<T> std::fmt::Debug for HttpResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResult")
            .field("status", &self.status)
            .field("error", &self.error)
            .field("headers", &self.headers.as_ref().map(http::HeaderMap::len))
            .field("raw_body", &self.raw_body.len())
            .field("has_value", &self.value.is_some())
            .finish()
    }
}
