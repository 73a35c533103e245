//! Class-level operations of a resource kind.
//!
//! A [`Resource`] pairs a [`Client`] with a [`ResourceDescriptor`] and
//! offers the operations that do not start from an existing entry: listing,
//! fetching by id and creating.
//!
//! # Example
//!
//! ```rust,ignore
//! use hcloud_entries::rest::ListParams;
//! use serde_json::json;
//!
//! let servers = client.servers();
//!
//! let page = servers
//!     .all(&ListParams { label_selector: Some("env=prod".into()), ..Default::default() })
//!     .await?;
//!
//! let server = servers.find(42).await?;
//!
//! let created = servers
//!     .create(json!({"name": "web-3", "server_type": "cx22", "image": "ubuntu-24.04"}))
//!     .await?;
//! let root_password = created.extra.get("root_password");
//! ```

use std::collections::HashMap;
use std::fmt::Display;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::clients::HttpMethod;
use crate::rest::action::Action;
use crate::rest::descriptor::ResourceDescriptor;
use crate::rest::dispatch::{ApiResponse, RequestDescriptor};
use crate::rest::entry::Entry;
use crate::rest::errors::ResourceError;
use crate::rest::path::instance_path;
use crate::rest::response::Collection;
use crate::rest::Client;

/// Common list filters.
///
/// `None` fields are omitted from the query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ListParams {
    /// Page number (1-based).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Entries per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    /// Exact name filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Label selector, e.g. `env=prod,tier!=db`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<String>,
    /// Status filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Sort order, e.g. `created:desc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// The result of a create call.
#[derive(Clone, Debug)]
pub struct Created {
    /// The action creating the entry, if the API started one.
    pub action: Option<Action>,
    /// The created entry.
    pub entry: Option<Entry>,
    /// Follow-up actions (`next_actions`).
    pub next_actions: Vec<Action>,
    /// Remaining top-level fields, e.g. `root_password`.
    pub extra: Map<String, Value>,
}

impl Created {
    /// Splits a create response into its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidAttribute`] on schema mismatches.
    pub fn from_response(response: &ApiResponse) -> Result<Self, ResourceError> {
        let client = response.client();
        let name = response.resource().name();

        let action = match response.body().get("action") {
            Some(raw) if raw.is_object() => Some(Action::from_raw(Some(client.clone()), raw)?),
            _ => None,
        };
        let entry = match response.body().get(name) {
            Some(raw) if raw.is_object() => Some(response.load_entry(raw)?),
            _ => None,
        };
        let next_actions = response
            .body()
            .get("next_actions")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|raw| Action::from_raw(Some(client.clone()), raw))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        let extra = response
            .body()
            .as_object()
            .map(|body| {
                body.iter()
                    .filter(|(key, _)| !matches!(key.as_str(), "action" | "next_actions") && *key != name)
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            action,
            entry,
            next_actions,
            extra,
        })
    }
}

/// Class-level handle of a resource kind.
#[derive(Clone, Debug)]
pub struct Resource {
    client: Client,
    descriptor: &'static ResourceDescriptor,
}

impl Resource {
    /// Creates a handle for `descriptor`.
    #[must_use]
    pub const fn new(client: Client, descriptor: &'static ResourceDescriptor) -> Self {
        Self { client, descriptor }
    }

    /// Returns the resource kind.
    #[must_use]
    pub const fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    /// Returns the client.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Builds an entry locally from raw attributes, bound to the client.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidAttribute`] on schema mismatches.
    pub fn build(&self, raw: &Value) -> Result<Entry, ResourceError> {
        Entry::from_raw(self.descriptor, Some(self.client.clone()), raw)
    }

    /// Lists entries.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] if `params` cannot be
    /// serialized, or any dispatch error.
    pub async fn all<P: Serialize + ?Sized>(&self, params: &P) -> Result<Collection, ResourceError> {
        let request = RequestDescriptor::new(HttpMethod::Get, self.descriptor.collection(), self.descriptor)
            .query(serialize_to_query(params)?)
            .autoload_action(false);

        self.client
            .prepare_request_with(request, |response| Collection::from_response(&response))
            .await
    }

    /// Lists entries with default parameters.
    ///
    /// # Errors
    ///
    /// Returns any dispatch error.
    pub async fn list(&self) -> Result<Collection, ResourceError> {
        self.all(&ListParams::default()).await
    }

    /// Fetches one entry by id.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] for unknown ids,
    /// [`ResourceError::UnexpectedResponse`] if the body carries no entry,
    /// or any other dispatch error.
    pub async fn find(&self, id: impl Display + Send) -> Result<Entry, ResourceError> {
        let id = id.to_string();
        let request = RequestDescriptor::new(
            HttpMethod::Get,
            instance_path(self.descriptor.collection(), &id),
            self.descriptor,
        )
        .subject(id)
        .autoload_action(false);

        self.client
            .prepare_request(request)
            .await?
            .into_entry()
            .ok_or_else(|| ResourceError::UnexpectedResponse {
                resource: self.descriptor.name(),
                message: format!("response carries no `{}`", self.descriptor.name()),
            })
    }

    /// Fetches the entry with the given name, if any.
    ///
    /// # Errors
    ///
    /// Returns any dispatch error.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Entry>, ResourceError> {
        let params = ListParams {
            name: Some(name.to_string()),
            ..ListParams::default()
        };
        Ok(self.all(&params).await?.into_inner().into_iter().next())
    }

    /// Creates an entry. The API must answer `201 Created`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ValidationFailed`] when the API rejects the
    /// body, or any other dispatch error.
    pub async fn create(&self, body: Value) -> Result<Created, ResourceError> {
        let request = RequestDescriptor::new(HttpMethod::Post, self.descriptor.collection(), self.descriptor)
            .body(body)
            .expected_code(201);

        self.client
            .prepare_request_with(request, |response| Created::from_response(&response))
            .await
    }
}

/// Serializes a params struct to a query parameter map.
///
/// `null` values are skipped; arrays become comma-separated lists.
pub(crate) fn serialize_to_query<T: Serialize + ?Sized>(params: &T) -> Result<HashMap<String, String>, ResourceError> {
    let value = serde_json::to_value(params).map_err(|e| ResourceError::InvalidInput {
        reason: format!("failed to serialize params: {e}"),
    })?;

    let mut query = HashMap::new();

    if let Value::Object(map) = value {
        for (key, val) in map {
            match val {
                Value::Null => {}
                Value::String(s) => {
                    query.insert(key, s);
                }
                Value::Number(n) => {
                    query.insert(key, n.to_string());
                }
                Value::Bool(b) => {
                    query.insert(key, b.to_string());
                }
                Value::Array(arr) => {
                    let values: Vec<String> = arr
                        .iter()
                        .filter_map(|v| match v {
                            Value::String(s) => Some(s.clone()),
                            Value::Number(n) => Some(n.to_string()),
                            _ => None,
                        })
                        .collect();
                    if !values.is_empty() {
                        query.insert(key, values.join(","));
                    }
                }
                Value::Object(_) => {
                    query.insert(key, val.to_string());
                }
            }
        }
    }

    Ok(query)
}
