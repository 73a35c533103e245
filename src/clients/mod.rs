//! HTTP transport types.
//!
//! This layer is a collaborator of the entry framework in [`crate::rest`]:
//! it knows nothing about schemas, entries or actions.
//!
//! - [`Transport`]: the object-safe seam the framework dispatches through
//! - [`HttpClient`]: reqwest-backed default transport
//! - [`HttpRequest`] / [`HttpRequestBuilder`]: a request to send
//! - [`HttpResponse`]: status, headers, parsed body and API metadata
//! - [`HttpError`]: unified transport error
//!
//! # Retry Behavior
//!
//! [`HttpClient`] retries 429 and 5xx responses up to the configured number
//! of tries (default 1, i.e. no retries). 429 responses honour `Retry-After`,
//! capped at [`MAX_RETRY_WAIT_TIME`] seconds;
//! everything else waits [`RETRY_WAIT_TIME`] seconds.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod transport;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use http_client::{HttpClient, MAX_RETRY_WAIT_TIME, RETRY_WAIT_TIME, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HttpResponse, Pagination, RateLimit};
pub use transport::Transport;
