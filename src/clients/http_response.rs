//! HTTP response types.
//!
//! [`HttpResponse`] carries the status code, headers, the parsed JSON body and
//! the metadata the API attaches to every exchange: rate limit headers and
//! the `meta.pagination` block of list responses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Rate limit information parsed from the `RateLimit-*` headers.
///
/// # Example
///
/// ```rust
/// use hcloud_entries::clients::RateLimit;
/// use std::collections::HashMap;
///
/// let mut headers = HashMap::new();
/// headers.insert("ratelimit-limit".to_string(), vec!["3600".to_string()]);
/// headers.insert("ratelimit-remaining".to_string(), vec!["3599".to_string()]);
/// headers.insert("ratelimit-reset".to_string(), vec!["1731000000".to_string()]);
///
/// let limit = RateLimit::from_headers(&headers).unwrap();
/// assert_eq!(limit.limit, 3600);
/// assert_eq!(limit.remaining, 3599);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests allowed per hour.
    pub limit: u32,
    /// Requests still available in the current window.
    pub remaining: u32,
    /// Unix timestamp at which the bucket is full again.
    pub reset: Option<i64>,
}

impl RateLimit {
    /// Parses the rate limit headers. Returns `None` unless both `limit`
    /// and `remaining` are present and numeric.
    #[must_use]
    pub fn from_headers(headers: &HashMap<String, Vec<String>>) -> Option<Self> {
        let first = |name: &str| headers.get(name).and_then(|v| v.first());

        let limit = first("ratelimit-limit")?.trim().parse().ok()?;
        let remaining = first("ratelimit-remaining")?.trim().parse().ok()?;
        let reset = first("ratelimit-reset").and_then(|v| v.trim().parse().ok());

        Some(Self {
            limit,
            remaining,
            reset,
        })
    }
}

/// Pagination block of a list response (`meta.pagination`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number.
    pub page: u32,
    /// Entries per page.
    pub per_page: u32,
    /// Previous page number, if any.
    pub previous_page: Option<u32>,
    /// Next page number, if any.
    pub next_page: Option<u32>,
    /// Last page number, if known.
    pub last_page: Option<u32>,
    /// Total number of entries, if known.
    pub total_entries: Option<u64>,
}

/// A response from the API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lower-cased names (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body (`{}` for empty bodies).
    pub body: serde_json::Value,
    /// Rate limit information.
    pub rate_limit: Option<RateLimit>,
    /// Seconds to wait before retrying (from the `Retry-After` header).
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing rate limit and `Retry-After`
    /// headers.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let rate_limit = RateLimit::from_headers(&headers);

        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.parse::<f64>().ok());

        Self {
            code,
            headers,
            body,
            rate_limit,
            retry_request_after,
        }
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-request-id")
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `meta.pagination` block of the body, if present.
    #[must_use]
    pub fn pagination(&self) -> Option<Pagination> {
        self.body
            .pointer("/meta/pagination")
            .and_then(|p| serde_json::from_value(p.clone()).ok())
    }

    /// Returns the API error code from `{"error": {"code": ...}}`.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        self.body.pointer("/error/code").and_then(|v| v.as_str())
    }

    /// Returns the `error.details` object, if present.
    #[must_use]
    pub fn error_details(&self) -> Option<&serde_json::Value> {
        self.body.pointer("/error/details").filter(|v| !v.is_null())
    }

    /// Returns the API error message, falling back to the raw body.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.body
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .map_or_else(|| self.body.to_string(), ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), json!({}));
            assert!(response.is_ok(), "Expected is_ok() to be true for code {code}");
        }
    }

    #[test]
    fn test_is_ok_returns_false_for_4xx_and_5xx() {
        for code in [400, 404, 422, 429, 500, 503] {
            assert!(!HttpResponse::new(code, HashMap::new(), json!({})).is_ok());
        }
    }

    #[test]
    fn test_rate_limit_parsing() {
        let mut headers = HashMap::new();
        headers.insert("ratelimit-limit".to_string(), vec!["3600".to_string()]);
        headers.insert("ratelimit-remaining".to_string(), vec!["12".to_string()]);

        let response = HttpResponse::new(200, headers, json!({}));
        let limit = response.rate_limit.unwrap();
        assert_eq!(limit.limit, 3600);
        assert_eq!(limit.remaining, 12);
        assert!(limit.reset.is_none());
    }

    #[test]
    fn test_rate_limit_requires_numeric_values() {
        let mut headers = HashMap::new();
        headers.insert("ratelimit-limit".to_string(), vec!["lots".to_string()]);
        headers.insert("ratelimit-remaining".to_string(), vec!["12".to_string()]);
        assert!(RateLimit::from_headers(&headers).is_none());

        headers.remove("ratelimit-limit");
        assert!(RateLimit::from_headers(&headers).is_none());
    }

    #[test]
    fn test_retry_after_parsing() {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["2.5".to_string()]);

        let response = HttpResponse::new(429, headers, json!({}));
        assert!((response.retry_request_after.unwrap() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pagination_from_meta() {
        let body = json!({
            "servers": [],
            "meta": {"pagination": {
                "page": 2, "per_page": 25, "previous_page": 1, "next_page": 3,
                "last_page": 4, "total_entries": 100
            }}
        });
        let response = HttpResponse::new(200, HashMap::new(), body);
        let pagination = response.pagination().unwrap();

        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.previous_page, Some(1));
        assert_eq!(pagination.next_page, Some(3));
        assert_eq!(pagination.total_entries, Some(100));
    }

    #[test]
    fn test_pagination_absent_without_meta() {
        let response = HttpResponse::new(200, HashMap::new(), json!({"server": {}}));
        assert!(response.pagination().is_none());
    }

    #[test]
    fn test_error_details_extraction() {
        let body = json!({"error": {"code": "not_found", "message": "server with ID '7' not found"}});
        let response = HttpResponse::new(404, HashMap::new(), body);
        assert_eq!(response.error_code(), Some("not_found"));
        assert_eq!(response.error_message(), "server with ID '7' not found");

        let response = HttpResponse::new(502, HashMap::new(), json!({"raw_body": "bad gateway"}));
        assert!(response.error_code().is_none());
        assert!(response.error_message().contains("bad gateway"));
    }

    #[test]
    fn test_request_id_extraction() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["abc-123".to_string()]);
        let response = HttpResponse::new(200, headers, json!({}));
        assert_eq!(response.request_id(), Some("abc-123"));
    }
}
