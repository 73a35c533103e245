//! HTTP-level error types.
//!
//! - [`HttpResponseError`]: a non-2xx (or unexpected) response from the API
//! - [`MaxHttpRetriesExceededError`]: retry attempts exhausted on 429/5xx
//! - [`InvalidHttpRequestError`]: a request that failed validation before sending
//! - [`HttpError`]: the unified error returned by every [`Transport`](crate::clients::Transport)
//!
//! # Example
//!
//! ```rust,ignore
//! use hcloud_entries::clients::HttpError;
//!
//! match transport.send(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::MaxRetries(e)) => println!("Gave up after {} tries", e.tries),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when a request receives a non-successful response.
///
/// The API reports failures as `{"error": {"code": "...", "message": "..."}}`;
/// the machine-readable `code` is kept in `error_code`.
///
/// # Example
///
/// ```rust
/// use hcloud_entries::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 403,
///     message: "server is locked".to_string(),
///     error_code: Some("locked".to_string()),
///     details: None,
///     error_reference: None,
/// };
/// assert_eq!(error.to_string(), "server is locked");
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Human readable error message.
    pub message: String,
    /// API error code (e.g. `not_found`, `rate_limit_exceeded`), if reported.
    pub error_code: Option<String>,
    /// The `error.details` object, if reported.
    pub details: Option<serde_json::Value>,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub error_reference: Option<String>,
}

/// Error returned when maximum retry attempts have been exhausted.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last message: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The number of tries that were attempted.
    pub tries: u32,
    /// Error message from the last response.
    pub message: String,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub error_reference: Option<String>,
}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The request path is empty.
    #[error("Cannot send a request without a path.")]
    EmptyPath,

    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A non-2xx or unexpected status code.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Maximum retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code, when the error came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::MaxRetries(e) => Some(e.code),
            Self::InvalidRequest(_) | Self::Network(_) => None,
        }
    }
}
