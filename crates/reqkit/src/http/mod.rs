//! One-shot HTTP request helpers.
//!
//! Every call builds its own transport client, sends a single request, and
//! folds the outcome into an [`HttpResult`] regardless of what went wrong:
//! transport failures, unacceptable status codes, and decode failures all
//! land in the result's error slot instead of being returned as `Err` or
//! panicking.
//!
//! # Example
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
//! let result = reqkit::get::<Post>(
//!     "https://jsonplaceholder.typicode.com/posts/1",
//!     RequestOptions::new(),
//! )
//! .await;
//!
//! if let Some(post) = result.value() {
//!     println!("{}: {}", result.status(), post.title);
//! }
//! ```
//!
//! # Response shapes
//!
//! The shape of the materialized value is picked statically through the
//! terminal methods on [`HttpCall`]:
//!
//! - [`json_response`](HttpCall::json_response) decodes the buffered body
//!   into any `serde`-deserializable type;
//! - [`text_response`](HttpCall::text_response) and
//!   [`bytes_response`](HttpCall::bytes_response) hand back the buffered
//!   body with no JSON parsing involved;
//! - [`send`](HttpCall::send) and
//!   [`stream_response`](HttpCall::stream_response) return the live
//!   response or its body stream with the body unread, transferring
//!   release responsibility to the caller;
//! - [`discard_response`](HttpCall::discard_response) and
//!   [`drain_response`](HttpCall::drain_response) are for callers who only
//!   care about status and error.

mod call;
mod config;
mod response;
mod result;

pub use call::{
    HttpCall, HttpMethod, HttpRequest, RequestBody, delete, get, post, post_form, post_json,
};
pub use config::{RedirectDecision, RedirectPolicy, RequestOptions};
pub use response::{BodyStream, RawResponse};
pub use result::HttpResult;
