//! Client configuration.
//!
//! - [`ClientConfig`]: everything the default HTTP transport needs
//! - [`ClientConfigBuilder`]: fluent construction with validation
//! - [`ApiToken`]: a validated, debug-masked bearer token
//! - [`BaseUrl`]: a validated API base URL
//!
//! # Example
//!
//! ```rust
//! use hcloud_entries::{ApiToken, BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .token(ApiToken::new("my-token").unwrap())
//!     .base_url(BaseUrl::new("https://api.hetzner.cloud/v1").unwrap())
//!     .tries(3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.tries(), 3);
//! ```

mod newtypes;

pub use newtypes::{ApiToken, BaseUrl};

use crate::error::ConfigError;

/// Configuration for a [`Client`](crate::Client).
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    token: ApiToken,
    base_url: BaseUrl,
    tries: u32,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the API token.
    #[must_use]
    pub const fn token(&self) -> &ApiToken {
        &self.token
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns how many times a request is attempted on 429/5xx responses.
    #[must_use]
    pub const fn tries(&self) -> u32 {
        self.tries
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// `token` is required. Defaults:
///
/// - `base_url`: [`BaseUrl::DEFAULT`]
/// - `tries`: `1` (no automatic retries)
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    token: Option<ApiToken>,
    base_url: Option<BaseUrl>,
    tries: Option<u32>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API token (required).
    #[must_use]
    pub fn token(mut self, token: ApiToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets how many times a request is attempted before giving up.
    #[must_use]
    pub const fn tries(mut self, tries: u32) -> Self {
        self.tries = Some(tries);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `token` is not set, or
    /// [`ConfigError::InvalidTries`] if `tries` is zero.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let token = self
            .token
            .ok_or(ConfigError::MissingRequiredField { field: "token" })?;

        let tries = self.tries.unwrap_or(1);
        if tries == 0 {
            return Err(ConfigError::InvalidTries { tries });
        }

        Ok(ClientConfig {
            token,
            base_url: self.base_url.unwrap_or_default(),
            tries,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> ApiToken {
        ApiToken::new("test-token").unwrap()
    }

    #[test]
    fn test_builder_applies_defaults() {
        let config = ClientConfig::builder().token(token()).build().unwrap();

        assert_eq!(config.base_url().as_ref(), BaseUrl::DEFAULT);
        assert_eq!(config.tries(), 1);
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_builder_requires_token() {
        let result = ClientConfig::builder().build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "token" })
        ));
    }

    #[test]
    fn test_builder_rejects_zero_tries() {
        let result = ClientConfig::builder().token(token()).tries(0).build();
        assert_eq!(result.unwrap_err(), ConfigError::InvalidTries { tries: 0 });
    }

    #[test]
    fn test_builder_keeps_all_options() {
        let config = ClientConfig::builder()
            .token(token())
            .base_url(BaseUrl::new("http://localhost:9000/v1").unwrap())
            .tries(4)
            .user_agent_prefix("my-tool/2.0")
            .build()
            .unwrap();

        assert_eq!(config.token().as_ref(), "test-token");
        assert_eq!(config.base_url().as_ref(), "http://localhost:9000/v1");
        assert_eq!(config.tries(), 4);
        assert_eq!(config.user_agent_prefix(), Some("my-tool/2.0"));
    }
}
