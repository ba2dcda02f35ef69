//! Per-call request options.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use super::call::HttpRequest;
use crate::error::HttpError;

/// A request interceptor: mutates the outgoing request immediately before
/// it is handed to the transport. Interceptors run in registration order.
pub(crate) type Interceptor = Arc<dyn Fn(&mut HttpRequest) + Send + Sync>;

/// Decision returned by a custom redirect policy.
#[derive(Clone, Debug)]
pub enum RedirectDecision {
    /// Follow the proposed redirect.
    Follow,
    /// Stop here; the redirect response itself becomes the response.
    Stop,
    /// Abort the request with the given message.
    Error(String),
}

/// Governs whether and how the transport follows redirects.
#[derive(Clone, Default)]
pub enum RedirectPolicy {
    /// The transport default (follow up to 10 hops).
    #[default]
    Default,
    /// Never follow; a redirect response is returned as-is.
    None,
    /// Follow at most `max` hops.
    Limited(usize),
    /// Decide per redirect from the proposed URL and the chain of
    /// previously visited URLs.
    Custom(Arc<dyn Fn(&Url, &[Url]) -> RedirectDecision + Send + Sync>),
}

impl RedirectPolicy {
    /// Wrap a decision function.
    ///
    /// The function receives the proposed redirect target and the URLs
    /// visited so far, oldest first.
    pub fn custom<F>(decide: F) -> Self
    where
        F: Fn(&Url, &[Url]) -> RedirectDecision + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(decide))
    }

    pub(crate) fn to_reqwest(&self) -> reqwest::redirect::Policy {
        match self {
            Self::Default => reqwest::redirect::Policy::default(),
            Self::None => reqwest::redirect::Policy::none(),
            Self::Limited(max) => reqwest::redirect::Policy::limited(*max),
            Self::Custom(decide) => {
                let decide = decide.clone();
                reqwest::redirect::Policy::custom(move |attempt| {
                    let decision = decide(attempt.url(), attempt.previous());
                    match decision {
                        RedirectDecision::Follow => attempt.follow(),
                        RedirectDecision::Stop => attempt.stop(),
                        RedirectDecision::Error(message) => attempt.error(message),
                    }
                })
            }
        }
    }
}

impl std::fmt::Debug for RedirectPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "Default"),
            Self::None => write!(f, "None"),
            Self::Limited(max) => write!(f, "Limited({max})"),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Options applied to a single call.
///
/// Built with consuming setter methods and passed to the call surface by
/// value; a call never mutates options after it starts. Scalar options
/// (timeout, redirect policy, raw-body flag, header map) follow last-wins;
/// the success-code set and the interceptor chain accumulate.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use reqkit::RequestOptions;
///
/// let options = RequestOptions::new()
///     .timeout(Duration::from_secs(5))
///     .success_codes([200, 201])
///     .raw_body();
/// ```
#[derive(Clone, Default)]
pub struct RequestOptions {
    pub(crate) timeout: Option<Duration>,
    pub(crate) headers: http::HeaderMap,
    pub(crate) raw_body: bool,
    pub(crate) redirect: RedirectPolicy,
    pub(crate) interceptors: Vec<Interceptor>,
    pub(crate) success_codes: Option<HashSet<u16>>,
}

impl RequestOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overall request deadline. Later calls override earlier ones.
    ///
    /// The value is handed to the transport unvalidated; the transport's
    /// own semantics apply to degenerate durations.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the header override map wholesale.
    ///
    /// When the map is non-empty, the outgoing request's headers are
    /// replaced by it (not merged) before the interceptor chain runs.
    pub fn headers(mut self, headers: http::HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Insert a single header into the override map.
    ///
    /// Invalid names or values are skipped.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.headers.insert(name, value);
        } else {
            tracing::warn!(target: "reqkit::http", "skipping invalid header in options");
        }
        self
    }

    /// Retain the raw response bytes in the result.
    ///
    /// Applies only to the buffered terminals; without this flag the result
    /// exposes an empty raw body even though the body was read.
    pub fn raw_body(mut self) -> Self {
        self.raw_body = true;
        self
    }

    /// Set the redirect policy. Later calls override earlier ones.
    pub fn redirect_policy(mut self, policy: RedirectPolicy) -> Self {
        self.redirect = policy;
        self
    }

    /// Disable redirect following for this call.
    pub fn no_redirects(self) -> Self {
        self.redirect_policy(RedirectPolicy::None)
    }

    /// Follow at most `max` redirects.
    pub fn max_redirects(self, max: usize) -> Self {
        self.redirect_policy(RedirectPolicy::Limited(max))
    }

    /// Treat exactly the given status codes as decodable successes.
    ///
    /// Codes accumulate across calls. Once any code is set, the set fully
    /// replaces the default 2xx range; there is no merging between the two.
    pub fn success_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.success_codes
            .get_or_insert_with(HashSet::new)
            .extend(codes);
        self
    }

    /// Treat a single status code as a decodable success.
    pub fn success_code(self, code: u16) -> Self {
        self.success_codes([code])
    }

    /// Append a request interceptor.
    ///
    /// Used by the POST variants to set Content-Type; the chain runs in
    /// registration order after the header override is applied.
    pub(crate) fn interceptor<F>(mut self, interceptor: F) -> Self
    where
        F: Fn(&mut HttpRequest) + Send + Sync + 'static,
    {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Whether `status` counts as a decodable success under these options.
    pub fn is_success_status(&self, status: u16) -> bool {
        match &self.success_codes {
            Some(codes) if !codes.is_empty() => codes.contains(&status),
            _ => (200..300).contains(&status),
        }
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, HttpError> {
        let mut builder = reqwest::Client::builder().redirect(self.redirect.to_reqwest());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| HttpError::Transport(e.to_string()))
    }
}

impl std::fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestOptions")
            .field("timeout", &self.timeout)
            .field("headers", &self.headers.len())
            .field("raw_body", &self.raw_body)
            .field("redirect", &self.redirect)
            .field("interceptors", &self.interceptors.len())
            .field("success_codes", &self.success_codes)
            .finish()
    }
}
