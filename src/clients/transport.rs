//! The seam between the entry framework and HTTP.
//!
//! Everything above this trait (dispatching, loading, autoloading) is
//! transport-agnostic. [`HttpClient`](crate::clients::HttpClient) is the
//! reqwest-backed default; tests plug in in-memory implementations.

use std::fmt;

use async_trait::async_trait;

use crate::clients::{HttpError, HttpRequest, HttpResponse};

/// Sends one [`HttpRequest`] and returns the parsed [`HttpResponse`].
///
/// Implementations own connection handling, authentication, retries and
/// timeouts. A response whose status is not the request's `expected_code`
/// (or not 2xx when none is set) must be returned as
/// [`HttpError::Response`].
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use hcloud_entries::clients::{HttpError, HttpRequest, HttpResponse, Transport};
/// use std::collections::HashMap;
///
/// #[derive(Debug)]
/// struct Canned;
///
/// #[async_trait]
/// impl Transport for Canned {
///     async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(HttpResponse::new(200, HashMap::new(), serde_json::json!({})))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends the request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}
