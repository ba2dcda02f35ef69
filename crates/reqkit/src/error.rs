//! Error types for request calls.

use thiserror::Error;

/// Errors produced while constructing a request, talking to the transport,
/// or materializing the response.
///
/// Errors are never returned directly from the call surface and never
/// panic; they are recorded in the error slot of the per-call
/// [`HttpResult`](crate::HttpResult). At most one cause is recorded per
/// call.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    /// The request URL could not be parsed. The call fails before any I/O.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request deadline elapsed.
    #[error("request timed out")]
    Timeout,

    /// The connection could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// The redirect policy aborted the request, or the redirect limit was
    /// exceeded.
    #[error("redirect error: {0}")]
    Redirect(String),

    /// Any other transport-level failure (TLS, protocol, client setup).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body stream failed mid-read.
    #[error("failed to read response body: {0}")]
    BodyRead(String),

    /// The status code fell outside the accepted success set.
    #[error("HTTP {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The raw response body text.
        body: String,
    },

    /// The response body could not be decoded into the requested type.
    #[error("decode error: {0}")]
    Decode(String),
}

/// A specialized `Result` for fallible response-handle operations.
pub type Result<T> = std::result::Result<T, HttpError>;

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_redirect() {
            Self::Redirect(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for HttpError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_carries_body_text() {
        let err = HttpError::Status {
            status: 404,
            body: "no such post".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: no such post");
    }

    #[test]
    fn test_url_parse_error_maps_to_invalid_url() {
        let err: HttpError = "://nope".parse::<url::Url>().unwrap_err().into();
        assert!(matches!(err, HttpError::InvalidUrl(_)));
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let err: HttpError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, HttpError::Decode(_)));
    }
}
