//! Request construction and dispatch.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::{Url, form_urlencoded};

use super::config::RequestOptions;
use super::response::{self, BodyStream, RawResponse};
use super::result::HttpResult;
use crate::error::HttpError;

/// HTTP request methods supported by the call surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP DELETE.
    Delete,
}

impl HttpMethod {
    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// The body of an outgoing request.
#[derive(Clone, Debug, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// Plain text body.
    Text(String),
    /// JSON body, serialized compactly at send time.
    Json(serde_json::Value),
    /// URL-encoded form pairs, in insertion order.
    Form(Vec<(String, String)>),
    /// Raw binary body.
    Bytes(Bytes),
}

impl RequestBody {
    fn into_reqwest(self) -> Option<reqwest::Body> {
        match self {
            Self::None => None,
            Self::Text(text) => Some(text.into()),
            Self::Json(value) => Some(value.to_string().into()),
            Self::Form(pairs) => {
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs)
                    .finish();
                Some(encoded.into())
            }
            Self::Bytes(bytes) => Some(bytes.into()),
        }
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// A transport-level request under construction, as seen by interceptors.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The parsed request URL.
    pub url: Url,
    /// Request headers.
    pub headers: http::HeaderMap,
    /// Request body.
    pub body: RequestBody,
}

/// A single pending request.
///
/// Construct with one of the verb constructors, optionally attach
/// [`RequestOptions`], then pick the terminal operation naming the response
/// shape you want. Every terminal resolves to a fully-populated
/// [`HttpResult`]; no terminal returns an error directly or panics.
///
/// # Example
///
/// ```ignore
/// use reqkit::{HttpCall, RequestOptions};
///
/// // Decoded object
/// let result = HttpCall::get("https://api.example.com/posts/1")
///     .options(RequestOptions::new().raw_body())
///     .json_response::<Post>()
///     .await;
///
/// // Raw transport response; the body stays unread
/// let result = HttpCall::get("https://api.example.com/archive.tar")
///     .send()
///     .await;
/// ```
pub struct HttpCall {
    method: HttpMethod,
    url: String,
    body: RequestBody,
    content_type: Option<String>,
    options: RequestOptions,
}

impl HttpCall {
    /// Create a call with an explicit method and no body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: RequestBody::None,
            content_type: None,
            options: RequestOptions::default(),
        }
    }

    /// GET `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// DELETE `url`.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// POST `body` to `url` with the given Content-Type.
    ///
    /// The Content-Type is applied through the interceptor chain, after
    /// every other interceptor, so it wins over any earlier value.
    pub fn post(
        url: impl Into<String>,
        content_type: impl Into<String>,
        body: impl Into<RequestBody>,
    ) -> Self {
        let mut call = Self::new(HttpMethod::Post, url);
        call.body = body.into();
        call.content_type = Some(content_type.into());
        call
    }

    /// POST URL-encoded form pairs to `url`.
    pub fn post_form(url: impl Into<String>, form: &[(&str, &str)]) -> Self {
        let pairs = form
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self::post(
            url,
            "application/x-www-form-urlencoded",
            RequestBody::Form(pairs),
        )
    }

    /// POST `value` serialized as compact JSON to `url`.
    ///
    /// A value that fails to serialize is logged and the request goes out
    /// without a body.
    pub fn post_json<B: Serialize + ?Sized>(url: impl Into<String>, value: &B) -> Self {
        let body = match serde_json::to_value(value) {
            Ok(value) => RequestBody::Json(value),
            Err(e) => {
                tracing::error!(target: "reqkit::http", "failed to serialize JSON body: {}", e);
                RequestBody::None
            }
        };
        Self::post(url, "application/json", body)
    }

    /// Attach options to this call.
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve the URL, apply the header override, and run the interceptor
    /// chain. Fails before any I/O on a malformed URL.
    fn prepare(self) -> Result<(RequestOptions, HttpRequest), HttpError> {
        let Self {
            method,
            url,
            body,
            content_type,
            mut options,
        } = self;

        let url: Url = url.parse()?;
        let mut request = HttpRequest {
            method,
            url,
            headers: http::HeaderMap::new(),
            body,
        };

        if !options.headers.is_empty() {
            request.headers = options.headers.clone();
        }

        // The POST variants install Content-Type as the last interceptor so
        // it overrides anything set earlier in the chain.
        if let Some(content_type) = content_type {
            match http::HeaderValue::try_from(content_type.as_str()) {
                Ok(value) => {
                    options = options.interceptor(move |request: &mut HttpRequest| {
                        request.headers.insert(CONTENT_TYPE, value.clone());
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        target: "reqkit::http",
                        "skipping invalid Content-Type '{}': {}",
                        content_type,
                        e
                    );
                }
            }
        }
        for interceptor in &options.interceptors {
            interceptor(&mut request);
        }

        Ok((options, request))
    }

    /// Build the per-call transport client and execute the request.
    async fn dispatch(self) -> Result<(RequestOptions, reqwest::Response), HttpError> {
        let (options, request) = self.prepare()?;
        let client = options.build_client()?;

        let mut outgoing = reqwest::Request::new(request.method.to_reqwest(), request.url);
        *outgoing.headers_mut() = request.headers;
        *outgoing.body_mut() = request.body.into_reqwest();

        let response = client.execute(outgoing).await?;
        Ok((options, response))
    }

    async fn buffered<T, F>(self, decode: F) -> HttpResult<T>
    where
        F: FnOnce(&Bytes) -> Result<T, HttpError>,
    {
        match self.dispatch().await {
            Ok((options, response)) => response::materialize(response, &options, decode).await,
            Err(e) => HttpResult::from_error(e),
        }
    }

    /// Send and hand back the raw transport response.
    ///
    /// The body is left unread and the status is not classified; reading
    /// and releasing the body is the caller's responsibility (dropping the
    /// [`RawResponse`] releases it). The result's own header slot stays
    /// empty; headers live on the handle.
    pub async fn send(self) -> HttpResult<RawResponse> {
        match self.dispatch().await {
            Ok((_, response)) => {
                let status = response.status().as_u16();
                HttpResult::with_value(status, RawResponse::new(response))
            }
            Err(e) => HttpResult::from_error(e),
        }
    }

    /// Send and hand back the unread, chunked body stream.
    ///
    /// Like [`send`](Self::send), release responsibility transfers to the
    /// caller.
    pub async fn stream_response(self) -> HttpResult<BodyStream> {
        match self.dispatch().await {
            Ok((_, response)) => {
                let status = response.status().as_u16();
                HttpResult::with_value(status, BodyStream::new(response))
            }
            Err(e) => HttpResult::from_error(e),
        }
    }

    /// Send and record only the status code.
    ///
    /// The body is not read and the status is not classified against the
    /// success set: a 500 here still yields an error-free result. Use
    /// [`drain_response`](Self::drain_response) when classification and
    /// headers are wanted without a decoded value.
    pub async fn discard_response(self) -> HttpResult<()> {
        match self.dispatch().await {
            Ok((_, response)) => HttpResult::with_value(response.status().as_u16(), ()),
            Err(e) => HttpResult::from_error(e),
        }
    }

    /// Send, consume the body, and classify the status without decoding.
    ///
    /// Headers and (when requested) the raw body are recorded exactly as in
    /// the decoding terminals; only the decode step is skipped.
    pub async fn drain_response(self) -> HttpResult<()> {
        self.buffered(|_| Ok(())).await
    }

    /// Send and return the buffered body reinterpreted as UTF-8 text.
    ///
    /// The bytes are converted directly (lossily for invalid UTF-8); no
    /// JSON parsing is involved.
    pub async fn text_response(self) -> HttpResult<String> {
        self.buffered(|data| Ok(String::from_utf8_lossy(data).into_owned()))
            .await
    }

    /// Send and return the buffered body bytes as-is.
    pub async fn bytes_response(self) -> HttpResult<Bytes> {
        self.buffered(|data| Ok(data.clone())).await
    }

    /// Send, buffer, classify, and decode the body as JSON into `T`.
    ///
    /// On a non-success status the body text becomes the error and decoding
    /// is skipped; on a decode failure the status code and (when requested)
    /// the raw body remain available for diagnosis.
    pub async fn json_response<T: DeserializeOwned>(self) -> HttpResult<T> {
        self.buffered(|data| serde_json::from_slice(data).map_err(HttpError::from))
            .await
    }
}

/// Send a GET request and decode the response as JSON into `T`.
///
/// # Example
///
/// ```ignore
/// use reqkit::RequestOptions;
///
/// #[derive(serde::Deserialize)]
/// struct Post {
///     id: u32,
///     title: String,
/// }
///
/// let result = reqkit::get::<Post>(
///     "https://jsonplaceholder.typicode.com/posts/1",
///     RequestOptions::new(),
/// )
/// .await;
/// assert!(result.is_ok());
/// ```
pub async fn get<T: DeserializeOwned>(url: &str, options: RequestOptions) -> HttpResult<T> {
    HttpCall::get(url).options(options).json_response().await
}

/// Send a POST request with an explicit Content-Type and decode the
/// response as JSON into `T`.
pub async fn post<T, B>(
    url: &str,
    content_type: &str,
    body: B,
    options: RequestOptions,
) -> HttpResult<T>
where
    T: DeserializeOwned,
    B: Into<RequestBody>,
{
    HttpCall::post(url, content_type, body)
        .options(options)
        .json_response()
        .await
}

/// Send URL-encoded form pairs and decode the response as JSON into `T`.
pub async fn post_form<T: DeserializeOwned>(
    url: &str,
    form: &[(&str, &str)],
    options: RequestOptions,
) -> HttpResult<T> {
    HttpCall::post_form(url, form)
        .options(options)
        .json_response()
        .await
}

/// Serialize `value` as JSON, POST it, and decode the response into `T`.
pub async fn post_json<T, B>(url: &str, value: &B, options: RequestOptions) -> HttpResult<T>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    HttpCall::post_json(url, value)
        .options(options)
        .json_response()
        .await
}

/// Send a DELETE request and decode the response as JSON into `T`.
pub async fn delete<T: DeserializeOwned>(url: &str, options: RequestOptions) -> HttpResult<T> {
    HttpCall::delete(url).options(options).json_response().await
}
