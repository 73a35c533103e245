//! Request path helpers.
//!
//! Entry requests target `[resource_url, suffix]` joined with `/`, where the
//! default resource URL is `{collection}/{id}`. Empty segments are dropped so
//! a missing suffix never produces a trailing slash.
//!
//! # Example
//!
//! ```rust
//! use hcloud_entries::rest::{join_path, ResourceOperation};
//! use hcloud_entries::clients::HttpMethod;
//!
//! assert_eq!(join_path("servers/42", Some("metrics")), "servers/42/metrics");
//! assert_eq!(join_path("servers/42", None), "servers/42");
//! assert_eq!(ResourceOperation::Update.default_http_method(), HttpMethod::Put);
//! ```

use std::fmt;

use crate::clients::HttpMethod;

/// Operations that can be performed on a resource or one of its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperation {
    /// Fetch one entry (GET /{collection}/{id}).
    Find,
    /// List entries (GET /{collection}).
    All,
    /// Create an entry (POST /{collection}).
    Create,
    /// Update an entry (PUT /{collection}/{id}).
    Update,
    /// Delete an entry (DELETE /{collection}/{id}).
    Delete,
    /// Change protection flags (POST .../actions/change_protection).
    ChangeProtection,
    /// Fetch metrics (GET .../metrics).
    Metrics,
    /// List or fetch nested actions (GET .../actions).
    Actions,
}

impl ResourceOperation {
    /// Returns the default HTTP method for this operation.
    #[must_use]
    pub const fn default_http_method(&self) -> HttpMethod {
        match self {
            Self::Find | Self::All | Self::Metrics | Self::Actions => HttpMethod::Get,
            Self::Create | Self::ChangeProtection => HttpMethod::Post,
            Self::Update => HttpMethod::Put,
            Self::Delete => HttpMethod::Delete,
        }
    }

    /// Returns the operation name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Find => "find",
            Self::All => "all",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ChangeProtection => "change protection of",
            Self::Metrics => "fetch metrics of",
            Self::Actions => "list actions of",
        }
    }

    /// Returns the path suffix appended to the resource URL, if any.
    #[must_use]
    pub const fn suffix(&self) -> Option<&'static str> {
        match self {
            Self::ChangeProtection => Some("actions/change_protection"),
            Self::Metrics => Some("metrics"),
            Self::Actions => Some("actions"),
            Self::Find | Self::All | Self::Create | Self::Update | Self::Delete => None,
        }
    }
}

impl fmt::Display for ResourceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joins a base path and an optional suffix with `/`.
///
/// Leading and trailing slashes on either part are ignored, as are empty
/// parts.
#[must_use]
pub fn join_path(base: &str, suffix: Option<&str>) -> String {
    [Some(base), suffix]
        .into_iter()
        .flatten()
        .map(|segment| segment.trim_matches('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Builds the default resource URL `{collection}/{id}`.
#[must_use]
pub fn instance_path(collection: &str, id: &str) -> String {
    join_path(collection, Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_http_methods() {
        assert_eq!(ResourceOperation::Find.default_http_method(), HttpMethod::Get);
        assert_eq!(ResourceOperation::All.default_http_method(), HttpMethod::Get);
        assert_eq!(ResourceOperation::Create.default_http_method(), HttpMethod::Post);
        assert_eq!(ResourceOperation::Update.default_http_method(), HttpMethod::Put);
        assert_eq!(ResourceOperation::Delete.default_http_method(), HttpMethod::Delete);
        assert_eq!(
            ResourceOperation::ChangeProtection.default_http_method(),
            HttpMethod::Post
        );
        assert_eq!(ResourceOperation::Metrics.default_http_method(), HttpMethod::Get);
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(
            ResourceOperation::ChangeProtection.suffix(),
            Some("actions/change_protection")
        );
        assert_eq!(ResourceOperation::Metrics.suffix(), Some("metrics"));
        assert_eq!(ResourceOperation::Update.suffix(), None);
    }

    #[test]
    fn test_join_path_drops_empty_segments() {
        assert_eq!(join_path("servers/1", Some("metrics")), "servers/1/metrics");
        assert_eq!(join_path("servers/1/", Some("/actions")), "servers/1/actions");
        assert_eq!(join_path("servers/1", Some("")), "servers/1");
        assert_eq!(join_path("servers/1", None), "servers/1");
        assert_eq!(join_path("", Some("actions")), "actions");
    }

    #[test]
    fn test_instance_path() {
        assert_eq!(instance_path("servers", "42"), "servers/42");
        assert_eq!(instance_path("floating_ips", "7"), "floating_ips/7");
    }
}
