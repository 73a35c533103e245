//! Validated newtype wrappers for configuration values.
//!
//! These wrap raw strings and validate them on construction, so a
//! [`ClientConfig`](crate::ClientConfig) can only ever hold usable values.

use crate::error::ConfigError;
use std::fmt;

/// A validated Hetzner Cloud API token.
///
/// The token is sent as a bearer credential on every request. Its `Debug`
/// output is masked so it never ends up in logs.
///
/// # Example
///
/// ```rust
/// use hcloud_entries::ApiToken;
///
/// let token = ApiToken::new("my-token").unwrap();
/// assert_eq!(token.as_ref(), "my-token");
/// assert_eq!(format!("{:?}", token), "ApiToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Creates a new validated API token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiToken`] if the token is empty or blank.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyApiToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for ApiToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(*****)")
    }
}

/// A validated API base URL, such as `https://api.hetzner.cloud/v1`.
///
/// Trailing slashes are stripped so paths can be appended with a single `/`.
///
/// # Example
///
/// ```rust
/// use hcloud_entries::BaseUrl;
///
/// let url = BaseUrl::new("https://api.hetzner.cloud/v1/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.hetzner.cloud/v1");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "api.hetzner.cloud");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// The public Hetzner Cloud endpoint.
    pub const DEFAULT: &'static str = "https://api.hetzner.cloud/v1";

    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no `http`/`https`
    /// scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidBaseUrl { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = &url[..scheme_end];
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(invalid());
        }

        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);
        if host_end == host_start {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        let url = Self::DEFAULT.to_string();
        Self {
            scheme_end: 5,
            host_start: 8,
            host_end: 8 + "api.hetzner.cloud".len(),
            url,
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_token_rejects_empty_string() {
        assert_eq!(ApiToken::new(""), Err(ConfigError::EmptyApiToken));
        assert_eq!(ApiToken::new("   "), Err(ConfigError::EmptyApiToken));
    }

    #[test]
    fn test_api_token_masks_value_in_debug() {
        let token = ApiToken::new("super-secret").unwrap();
        let debug = format!("{token:?}");
        assert_eq!(debug, "ApiToken(*****)");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let url = BaseUrl::new("https://api.hetzner.cloud/v1/").unwrap();
        assert_eq!(url.as_ref(), "https://api.hetzner.cloud/v1");
    }

    #[test]
    fn test_base_url_accepts_local_mock_server() {
        let url = BaseUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_name(), "127.0.0.1");
    }

    #[test]
    fn test_base_url_rejects_invalid() {
        for bad in ["", "api.hetzner.cloud", "ftp://api.hetzner.cloud", "https://", "https:///v1"] {
            assert!(
                matches!(BaseUrl::new(bad), Err(ConfigError::InvalidBaseUrl { .. })),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_default_base_url_matches_parsed_default() {
        assert_eq!(BaseUrl::default(), BaseUrl::new(BaseUrl::DEFAULT).unwrap());
    }
}
