//! One-shot typed HTTP request helpers.
//!
//! `reqkit` is a thin façade over [`reqwest`] for callers who want a single
//! function call per request and a uniform, non-panicking result: issue a
//! GET/POST/DELETE, apply per-call options (timeout, header override,
//! redirect policy, raw-body capture, a custom success-status set), and get
//! back an [`HttpResult`] carrying the error slot, status code, headers,
//! raw body, and the decoded value.
//!
//! # Quick start
//!
//! ```ignore
//! use reqkit::RequestOptions;
//!
//! #[derive(serde::Deserialize)]
//! struct Post {
//!     id: u32,
//!     title: String,
//! }
//!
//! // Decoded object
//! let result = reqkit::get::<Post>("https://api.example.com/posts/1", RequestOptions::new()).await;
//! if let Some(post) = result.value() {
//!     println!("{}", post.title);
//! }
//!
//! // POST a JSON value, keep the raw bytes around for diagnosis
//! let result = reqkit::post_json::<serde_json::Value, _>(
//!     "https://api.example.com/posts",
//!     &serde_json::json!({"title": "hello"}),
//!     RequestOptions::new().raw_body(),
//! )
//! .await;
//! ```
//!
//! # Options
//!
//! ```ignore
//! use std::time::Duration;
//! use reqkit::{RedirectDecision, RedirectPolicy, RequestOptions};
//!
//! let options = RequestOptions::new()
//!     .timeout(Duration::from_secs(5))
//!     // these two status codes, and only these, count as success
//!     .success_codes([200, 201])
//!     .redirect_policy(RedirectPolicy::custom(|url, via| {
//!         if via.len() >= 3 {
//!             RedirectDecision::Error("too deep".into())
//!         } else if url.host_str() == Some("trusted.example.com") {
//!             RedirectDecision::Follow
//!         } else {
//!             RedirectDecision::Stop
//!         }
//!     }));
//! ```
//!
//! # Error handling
//!
//! Nothing on the call surface returns `Err` or panics; check
//! [`HttpResult::error`] (or convert with [`HttpResult::into_result`])
//! before trusting the value. See [`HttpError`] for the taxonomy.

mod error;
pub mod http;

pub use error::{HttpError, Result};

// Re-export commonly used types at the crate root
pub use http::{
    BodyStream, HttpCall, HttpMethod, HttpRequest, HttpResult, RawResponse, RedirectDecision,
    RedirectPolicy, RequestBody, RequestOptions, delete, get, post, post_form, post_json,
};
