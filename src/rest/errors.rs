//! Error types for entry and resource operations.
//!
//! [`ResourceError`] is returned by every operation of the entry framework.
//! Transport failures arrive as [`HttpError`] and are mapped to semantic
//! variants where the API gives them a meaning:
//!
//! - **404**: [`ResourceError::NotFound`]
//! - **422** or `invalid_input`: [`ResourceError::ValidationFailed`]
//! - **Everything else**: [`ResourceError::Http`], unchanged
//!
//! Local precondition failures (unknown attributes, missing capabilities,
//! bad arguments) are raised before any request is sent.
//!
//! # Example
//!
//! ```rust,ignore
//! use hcloud_entries::rest::ResourceError;
//!
//! match servers.find(42).await {
//!     Ok(server) => println!("found {:?}", server.attribute("name")),
//!     Err(ResourceError::NotFound { resource, id, .. }) => {
//!         println!("{resource} {id} is gone");
//!     }
//!     Err(ResourceError::ValidationFailed { fields, .. }) => {
//!         for (field, messages) in fields {
//!             println!("{field}: {messages:?}");
//!         }
//!     }
//!     Err(e) => println!("other error: {e}"),
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::clients::HttpError;
use crate::rest::path::ResourceOperation;

/// An optional behaviour a resource kind can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Entries can be updated (`updatable` fields declared).
    Updatable,
    /// Entries can be deleted.
    Destructible,
    /// Entries support `change_protection`.
    Protectable,
    /// Entries expose a nested action collection.
    Actions,
    /// Entries expose a metrics endpoint.
    Metrics,
}

impl Capability {
    /// Returns the lowercase name of the capability.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Updatable => "updatable",
            Self::Destructible => "destructible",
            Self::Protectable => "protectable",
            Self::Actions => "actions",
            Self::Metrics => "metrics",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for entry and resource operations.
///
/// # Example
///
/// ```rust
/// use hcloud_entries::rest::ResourceError;
///
/// let error = ResourceError::InvalidArgument {
///     key: "backup".to_string(),
///     allowed: vec!["delete".to_string(), "rebuild".to_string()],
/// };
/// assert!(error.to_string().contains("backup"));
/// assert!(error.to_string().contains("delete, rebuild"));
/// ```
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The entry does not exist (HTTP 404).
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Singular name of the resource kind.
        resource: &'static str,
        /// The id (or path) that was requested.
        id: String,
        /// The API error message.
        message: String,
        /// The API error code, such as `not_found`.
        error_code: Option<String>,
        /// The `X-Request-Id` of the failed request.
        request_id: Option<String>,
    },

    /// The API rejected the request body (HTTP 422 / `invalid_input`).
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// The API error message.
        message: String,
        /// Field names mapped to their error messages.
        fields: HashMap<String, Vec<String>>,
        /// The `X-Request-Id` of the failed request.
        request_id: Option<String>,
    },

    /// Call arguments failed local validation.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// A key outside an allowed set was supplied.
    #[error("{key} is not allowed (allowed: {})", allowed.join(", "))]
    InvalidArgument {
        /// The offending key.
        key: String,
        /// The keys that are accepted.
        allowed: Vec<String>,
    },

    /// An attribute that neither the schema declares nor the entry holds.
    #[error("{resource} has no attribute {attribute}")]
    UnknownAttribute {
        /// Singular name of the resource kind.
        resource: &'static str,
        /// The requested attribute name.
        attribute: String,
    },

    /// Assignment to a field that is not declared updatable.
    #[error("{attribute} of {resource} is not updatable")]
    NotUpdatable {
        /// Singular name of the resource kind.
        resource: &'static str,
        /// The field that was assigned.
        attribute: String,
    },

    /// The resource kind does not declare the capability an operation needs.
    #[error("{resource} does not support {capability}")]
    CapabilityMissing {
        /// Singular name of the resource kind.
        resource: &'static str,
        /// The missing capability.
        capability: Capability,
    },

    /// An instance operation on an entry without an `id`.
    #[error("Cannot {operation} {resource} without an id")]
    MissingId {
        /// Singular name of the resource kind.
        resource: &'static str,
        /// The operation being attempted.
        operation: ResourceOperation,
    },

    /// A remote operation on an entry that has no client handle.
    #[error("{resource} entry is not bound to a client")]
    MissingClient {
        /// Singular name of the resource kind.
        resource: &'static str,
    },

    /// A raw value did not match the declared field type.
    #[error("{resource}.{field}: expected {expected}, found {found}")]
    InvalidAttribute {
        /// Singular name of the resource kind.
        resource: &'static str,
        /// Dotted path of the field.
        field: String,
        /// The declared type.
        expected: &'static str,
        /// The JSON type that was found.
        found: &'static str,
    },

    /// A successful response lacked the payload the operation needs.
    #[error("Unexpected response for {resource}: {message}")]
    UnexpectedResponse {
        /// Singular name of the resource kind.
        resource: &'static str,
        /// What was missing or malformed.
        message: String,
    },

    /// A resource kind was registered twice.
    #[error("{resource} is already registered")]
    AlreadyRegistered {
        /// Singular name of the resource kind.
        resource: &'static str,
    },

    /// A transport error that does not map to a more specific variant.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ResourceError {
    /// Maps a transport error onto the semantic variants.
    ///
    /// `id` names the requested entry in [`ResourceError::NotFound`]; when
    /// absent the request path is used.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hcloud_entries::clients::{HttpError, HttpResponseError};
    /// use hcloud_entries::rest::ResourceError;
    ///
    /// let error = HttpError::Response(HttpResponseError {
    ///     code: 404,
    ///     message: "server not found".to_string(),
    ///     error_code: Some("not_found".to_string()),
    ///     details: None,
    ///     error_reference: None,
    /// });
    /// let error = ResourceError::from_http_error(error, "server", "servers/7");
    /// assert!(matches!(error, ResourceError::NotFound { .. }));
    /// ```
    #[must_use]
    pub fn from_http_error(error: HttpError, resource: &'static str, id: &str) -> Self {
        match error {
            HttpError::Response(e) if e.code == 404 => Self::NotFound {
                resource,
                id: id.to_string(),
                message: e.message,
                error_code: e.error_code,
                request_id: e.error_reference,
            },
            HttpError::Response(e)
                if e.code == 422 || e.error_code.as_deref() == Some("invalid_input") =>
            {
                Self::ValidationFailed {
                    fields: e
                        .details
                        .as_ref()
                        .map(parse_validation_fields)
                        .unwrap_or_default(),
                    message: e.message,
                    request_id: e.error_reference,
                }
            }
            other => Self::Http(other),
        }
    }

    /// Returns the request ID if available.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::NotFound { request_id, .. } | Self::ValidationFailed { request_id, .. } => {
                request_id.as_deref()
            }
            Self::Http(HttpError::Response(e)) => e.error_reference.as_deref(),
            Self::Http(HttpError::MaxRetries(e)) => e.error_reference.as_deref(),
            _ => None,
        }
    }
}

/// Parses `error.details.fields` into a field-to-messages map.
///
/// The API reports field errors as:
/// ```json
/// {"fields": [{"name": "name", "messages": ["name is already used"]}]}
/// ```
fn parse_validation_fields(details: &serde_json::Value) -> HashMap<String, Vec<String>> {
    let mut fields = HashMap::new();

    let Some(entries) = details.get("fields").and_then(|f| f.as_array()) else {
        return fields;
    };

    for entry in entries {
        let Some(name) = entry.get("name").and_then(|n| n.as_str()) else {
            continue;
        };
        let messages = entry
            .get("messages")
            .and_then(|m| m.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| m.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();
        fields.insert(name.to_string(), messages);
    }

    fields
}
