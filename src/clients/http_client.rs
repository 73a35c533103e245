//! reqwest-backed [`Transport`].
//!
//! [`HttpClient`] sends authenticated JSON requests to the API base URL,
//! checks the response against the expected status code and retries 429/5xx
//! responses when more than one try is configured.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::clients::errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::Transport;
use crate::config::ClientConfig;

/// Fixed retry wait time in seconds when no `Retry-After` header is sent.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Upper bound in seconds for a server-supplied `Retry-After` wait.
pub const MAX_RETRY_WAIT_TIME: u64 = 60;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for the API.
///
/// `HttpClient` is `Send + Sync` and cheap to share behind an `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// use hcloud_entries::clients::{HttpClient, HttpMethod, HttpRequest, Transport};
/// use hcloud_entries::{ApiToken, ClientConfig};
///
/// let config = ClientConfig::builder()
///     .token(ApiToken::new("my-token").unwrap())
///     .build()
///     .unwrap();
/// let client = HttpClient::new(&config);
///
/// let request = HttpRequest::builder(HttpMethod::Get, "servers").build().unwrap();
/// let response = client.send(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    default_headers: HashMap<String, String>,
    tries: u32,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created, which only
    /// happens when TLS initialization fails.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}hcloud-entries v{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", config.token().as_ref()),
        );

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url().as_ref().to_string(),
            default_headers,
            tries: config.tries(),
        }
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the default number of attempts per request.
    #[must_use]
    pub const fn tries(&self) -> u32 {
        self.tries
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    fn calculate_retry_delay(response: &HttpResponse, status: u16) -> std::time::Duration {
        if status == 429 {
            if let Some(retry_after) = response.retry_request_after.filter(|s| !s.is_nan()) {
                let max = std::time::Duration::from_secs(MAX_RETRY_WAIT_TIME);
                return std::time::Duration::try_from_secs_f64(retry_after.max(0.0))
                    .map_or(max, |delay| delay.min(max));
            }
        }
        std::time::Duration::from_secs(RETRY_WAIT_TIME)
    }

    fn response_error(response: &HttpResponse) -> HttpResponseError {
        HttpResponseError {
            code: response.code,
            message: response.error_message(),
            error_code: response.error_code().map(String::from),
            details: response.error_details().cloned(),
            error_reference: response.request_id().map(String::from),
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.url_for(&request.path);
        let max_tries = request.tries.unwrap_or(self.tries).max(1);

        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let mut req_builder = match request.http_method {
                HttpMethod::Get => self.client.get(&url),
                HttpMethod::Post => self.client.post(&url),
                HttpMethod::Put => self.client.put(&url),
                HttpMethod::Delete => self.client.delete(&url),
            };

            for (key, value) in &self.default_headers {
                req_builder = req_builder.header(key, value);
            }
            if let Some(query) = &request.query {
                req_builder = req_builder.query(query);
            }
            if let Some(body) = &request.body {
                req_builder = req_builder
                    .header("Content-Type", "application/json")
                    .body(body.to_string());
            }

            tracing::debug!(method = request.http_method.as_str(), path = %request.path, attempt = tries, "sending request");
            let res = req_builder.send().await?;

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let body_text = res.text().await.unwrap_or_default();

            let body = if body_text.trim().is_empty() {
                serde_json::json!({})
            } else {
                serde_json::from_str(&body_text)
                    .unwrap_or_else(|_| serde_json::json!({ "raw_body": body_text }))
            };

            let response = HttpResponse::new(code, res_headers, body);

            if response.is_ok() {
                return match request.expected_code {
                    Some(expected) if expected != code => {
                        tracing::warn!(expected, code, path = %request.path, "unexpected status code");
                        Err(HttpError::Response(HttpResponseError {
                            code,
                            message: format!("expected status {expected}, got {code}"),
                            error_code: Some("unexpected_status".to_string()),
                            details: None,
                            error_reference: response.request_id().map(String::from),
                        }))
                    }
                    _ => Ok(response),
                };
            }

            let should_retry = code == 429 || code >= 500;
            if !should_retry || max_tries == 1 {
                return Err(HttpError::Response(Self::response_error(&response)));
            }

            if tries >= max_tries {
                let error = Self::response_error(&response);
                return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                    code,
                    tries: max_tries,
                    message: error.message,
                    error_reference: error.error_reference,
                }));
            }

            let delay = Self::calculate_retry_delay(&response, code);
            tracing::warn!(code, attempt = tries, delay_secs = delay.as_secs_f64(), path = %request.path, "retrying request");
            tokio::time::sleep(delay).await;
        }
    }
}
