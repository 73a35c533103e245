//! Request dispatch and response routing.
//!
//! A [`RequestDescriptor`] describes one call: method, path, body, query,
//! expected status, the resource kind to load the response as and whether
//! embedded actions should be autoloaded. [`Client::dispatch`] sends it and
//! wraps the result in an [`ApiResponse`], which [`Outcome::from_response`]
//! turns into entries and actions:
//!
//! | primary attributes | actions | outcome                             |
//! |--------------------|---------|-------------------------------------|
//! | list               | any     | [`Outcome::Collection`]             |
//! | object             | some    | [`Outcome::ActionsAndEntry`]        |
//! | object             | none    | [`Outcome::Entry`]                  |
//! | absent             | some    | [`Outcome::Actions`]                |
//! | absent             | none    | [`Outcome::Empty`]                  |
//!
//! Actions are only looked for when autoload was requested. An `actions`
//! list takes precedence over a singular `action`. Actions embedded next to
//! a list are not read. Requests that load the `action` kind itself never
//! autoload, so an action is not returned twice.
//!
//! [`Client::dispatch`]: crate::rest::Client::dispatch

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::clients::{HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::rest::action::{self, Action};
use crate::rest::descriptor::ResourceDescriptor;
use crate::rest::entry::Entry;
use crate::rest::errors::ResourceError;
use crate::rest::response::Collection;
use crate::rest::Client;

/// One request to dispatch.
///
/// # Example
///
/// ```rust
/// use hcloud_entries::clients::HttpMethod;
/// use hcloud_entries::rest::{resources::server, RequestDescriptor};
///
/// let request = RequestDescriptor::new(HttpMethod::Get, "servers", server::descriptor())
///     .query_param("label_selector", "env=prod")
///     .autoload_action(false);
///
/// assert_eq!(request.path(), "servers");
/// assert_eq!(request.query_params().get("label_selector").map(String::as_str), Some("env=prod"));
/// ```
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    method: HttpMethod,
    path: String,
    resource: &'static ResourceDescriptor,
    body: Option<Value>,
    query: HashMap<String, String>,
    expected_code: Option<u16>,
    autoload_action: bool,
    subject: Option<String>,
}

impl RequestDescriptor {
    /// Creates a request for `path`, loading responses as `resource`.
    /// Autoload is on by default.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>, resource: &'static ResourceDescriptor) -> Self {
        Self {
            method,
            path: path.into(),
            resource,
            body: None,
            query: HashMap::new(),
            expected_code: None,
            autoload_action: true,
            subject: None,
        }
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Replaces the query parameters.
    #[must_use]
    pub fn query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Requires an exact success status code.
    #[must_use]
    pub const fn expected_code(mut self, code: u16) -> Self {
        self.expected_code = Some(code);
        self
    }

    /// Turns action autoloading on or off.
    #[must_use]
    pub const fn autoload_action(mut self, autoload: bool) -> Self {
        self.autoload_action = autoload;
        self
    }

    /// Names the entry the request is about, reported in `NotFound` errors.
    #[must_use]
    pub fn subject(mut self, id: impl Into<String>) -> Self {
        self.subject = Some(id.into());
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the request path relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the resource kind responses are loaded as.
    #[must_use]
    pub const fn resource(&self) -> &'static ResourceDescriptor {
        self.resource
    }

    /// Returns the JSON body, if any.
    #[must_use]
    pub const fn body_value(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns the query parameters.
    #[must_use]
    pub const fn query_params(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// Returns the expected status code, if any.
    #[must_use]
    pub const fn expected(&self) -> Option<u16> {
        self.expected_code
    }

    /// Returns `true` if embedded actions are autoloaded. Always `false`
    /// when the response is loaded as the `action` kind.
    #[must_use]
    pub fn autoloads_action(&self) -> bool {
        autoloads(self.resource, self.autoload_action)
    }

    pub(crate) fn subject_or_path(&self) -> &str {
        self.subject.as_deref().unwrap_or(&self.path)
    }

    pub(crate) fn into_http_request(self) -> Result<HttpRequest, ResourceError> {
        let mut builder = HttpRequest::builder(self.method, self.path)
            .maybe_body(self.body)
            .query(self.query);
        if let Some(code) = self.expected_code {
            builder = builder.expected_code(code);
        }
        builder.build().map_err(|e| ResourceError::Http(HttpError::from(e)))
    }
}

/// A successful response together with the context it was requested in.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    http: Arc<HttpResponse>,
    client: Client,
    resource: &'static ResourceDescriptor,
    autoload_action: bool,
}

impl ApiResponse {
    /// Wraps a transport response.
    #[must_use]
    pub fn new(
        http: HttpResponse,
        client: Client,
        resource: &'static ResourceDescriptor,
        autoload_action: bool,
    ) -> Self {
        Self {
            http: Arc::new(http),
            client,
            resource,
            autoload_action: autoloads(resource, autoload_action),
        }
    }

    /// Returns the shared transport response.
    #[must_use]
    pub const fn http(&self) -> &Arc<HttpResponse> {
        &self.http
    }

    /// Returns the parsed JSON body.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.http.body
    }

    /// Returns the client the request was sent with.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the resource kind the response is loaded as.
    #[must_use]
    pub const fn resource(&self) -> &'static ResourceDescriptor {
        self.resource
    }

    /// Returns `true` if action autoloading was requested.
    #[must_use]
    pub const fn autoload_action(&self) -> bool {
        self.autoload_action
    }

    /// Returns the primary attributes: `body[singular]`, else
    /// `body[collection]`.
    #[must_use]
    pub fn resource_attributes(&self) -> Option<&Value> {
        let body = self.body();
        body.get(self.resource.name())
            .filter(|v| !v.is_null())
            .or_else(|| body.get(self.resource.collection()).filter(|v| !v.is_null()))
    }

    /// Loads a raw object as an entry of this response's resource kind,
    /// bound to the client and this response.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidAttribute`] on schema mismatches.
    pub fn load_entry(&self, raw: &Value) -> Result<Entry, ResourceError> {
        Ok(Entry::from_raw(self.resource, Some(self.client.clone()), raw)?
            .with_response(Arc::clone(&self.http)))
    }

    /// Extracts embedded actions, if autoload was requested.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidAttribute`] on malformed actions.
    pub fn actions(&self) -> Result<Option<Actions>, ResourceError> {
        if !self.autoload_action {
            return Ok(None);
        }

        let body = self.body();
        if let Some(items) = body.get("actions").and_then(Value::as_array) {
            let actions = items
                .iter()
                .map(|raw| Action::from_raw(Some(self.client.clone()), raw))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Some(Actions::List(actions)));
        }

        match body.get("action") {
            Some(raw) if raw.is_object() => Ok(Some(Actions::Single(Action::from_raw(
                Some(self.client.clone()),
                raw,
            )?))),
            _ => Ok(None),
        }
    }
}

fn autoloads(resource: &'static ResourceDescriptor, requested: bool) -> bool {
    requested && !std::ptr::eq(resource, action::descriptor())
}

/// Actions embedded in a response.
#[derive(Clone, Debug, PartialEq)]
pub enum Actions {
    /// A singular `action` object.
    Single(Action),
    /// An `actions` list.
    List(Vec<Action>),
}

impl Actions {
    /// Returns the actions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Action] {
        match self {
            Self::Single(action) => std::slice::from_ref(action),
            Self::List(actions) => actions,
        }
    }

    /// Converts into a vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<Action> {
        match self {
            Self::Single(action) => vec![action],
            Self::List(actions) => actions,
        }
    }

    /// Returns the number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` for an empty `actions` list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// What a response turned into.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// Neither primary attributes nor actions.
    Empty,
    /// A single entry.
    Entry(Entry),
    /// A list of entries. Actions embedded in a list response are not read.
    Collection(Collection),
    /// Actions only.
    Actions(Actions),
    /// Actions alongside the primary entry.
    ActionsAndEntry(Actions, Entry),
}

impl Outcome {
    /// Routes a response through the loader and the action autoloader.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidAttribute`] if the primary attributes
    /// or an embedded action do not match their schema.
    pub fn from_response(response: &ApiResponse) -> Result<Self, ResourceError> {
        let primary = response.resource_attributes();

        if let Some(Value::Array(_)) = primary {
            return Collection::from_response(response).map(Self::Collection);
        }

        let entry = primary.map(|raw| response.load_entry(raw)).transpose()?;
        let actions = response.actions()?;

        Ok(match (actions, entry) {
            (Some(actions), Some(entry)) => Self::ActionsAndEntry(actions, entry),
            (Some(actions), None) => Self::Actions(actions),
            (None, Some(entry)) => Self::Entry(entry),
            (None, None) => Self::Empty,
        })
    }

    /// Returns `true` for [`Outcome::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the primary entry, if any.
    #[must_use]
    pub fn into_entry(self) -> Option<Entry> {
        match self {
            Self::Entry(entry) | Self::ActionsAndEntry(_, entry) => Some(entry),
            _ => None,
        }
    }

    /// Returns the collection, if any.
    #[must_use]
    pub fn into_collection(self) -> Option<Collection> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Splits into embedded actions and the primary entry.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Action>, Option<Entry>) {
        match self {
            Self::Empty | Self::Collection(_) => (Vec::new(), None),
            Self::Entry(entry) => (Vec::new(), Some(entry)),
            Self::Actions(actions) => (actions.into_vec(), None),
            Self::ActionsAndEntry(actions, entry) => (actions.into_vec(), Some(entry)),
        }
    }
}
