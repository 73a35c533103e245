//! The generic entry.
//!
//! An [`Entry`] is one API object: a [`ResourceDescriptor`] saying what kind
//! it is, an [`AttributeStore`] holding its change-tracked attributes, the
//! [`Client`] it talks through and the response it was loaded from. Every
//! resource kind shares this one implementation; the descriptor's capability
//! flags decide which operations succeed.
//!
//! # Lifecycle
//!
//! ```text
//! Unloaded -> Loaded <-> Modified -> (save) -> Loaded
//!                 \-> (destroy) -> Destroyed
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use hcloud_entries::rest::MetricsParams;
//!
//! let mut server = client.servers().find(42).await?;
//! server.set("name", "web-2")?;
//! let actions = server.save().await?;
//!
//! let action = server
//!     .change_protection([("delete", true), ("rebuild", true)])
//!     .await?;
//!
//! let metrics = server
//!     .metrics(&MetricsParams::new().metric_type("cpu").start(start).end(end))
//!     .await?;
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::HttpResponse;
use crate::rest::action::{Action, ActionResource};
use crate::rest::descriptor::ResourceDescriptor;
use crate::rest::dispatch::{Outcome, RequestDescriptor};
use crate::rest::errors::{Capability, ResourceError};
use crate::rest::loader::{AttributeValue, ResourceLoader};
use crate::rest::metrics::MetricsParams;
use crate::rest::path::{instance_path, join_path, ResourceOperation};
use crate::rest::tracking::AttributeStore;
use crate::rest::Client;

static NULL: AttributeValue = AttributeValue::Null;

/// A change-tracked API object.
#[derive(Clone)]
pub struct Entry {
    descriptor: &'static ResourceDescriptor,
    client: Option<Client>,
    attributes: AttributeStore,
    response: Option<Arc<HttpResponse>>,
    destroyed: bool,
}

impl Entry {
    /// Creates an entry without attributes.
    #[must_use]
    pub const fn new(descriptor: &'static ResourceDescriptor, client: Option<Client>) -> Self {
        Self {
            descriptor,
            client,
            attributes: AttributeStore::new(),
            response: None,
            destroyed: false,
        }
    }

    /// Creates an entry from raw attributes. `null` yields an empty entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidAttribute`] on schema mismatches.
    pub fn from_raw(
        descriptor: &'static ResourceDescriptor,
        client: Option<Client>,
        raw: &Value,
    ) -> Result<Self, ResourceError> {
        let mut entry = Self::new(descriptor, client);
        entry.load(raw)?;
        Ok(entry)
    }

    pub(crate) fn with_response(mut self, response: Arc<HttpResponse>) -> Self {
        self.response = Some(response);
        self
    }

    /// Returns the resource kind.
    #[must_use]
    pub const fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    /// Returns the client handle, if bound.
    #[must_use]
    pub const fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    /// Binds the entry to a client.
    pub fn set_client(&mut self, client: Client) {
        self.client = Some(client);
    }

    /// Returns the response the entry was loaded from, if any.
    #[must_use]
    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_deref()
    }

    /// Replaces all attributes with `raw`, discarding pending changes.
    /// `null` leaves the entry untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidAttribute`] on schema mismatches; the
    /// entry is unchanged in that case.
    pub fn load(&mut self, raw: &Value) -> Result<(), ResourceError> {
        let loader = ResourceLoader::new(
            self.descriptor.name(),
            self.descriptor.schema(),
            self.client.as_ref(),
        );
        if let Some(attributes) = loader.load(raw)? {
            self.attributes.replace(attributes);
        }
        Ok(())
    }

    /// Returns the `id` attribute as used in request paths.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.attributes.get("id")? {
            AttributeValue::Integer(id) => Some(id.to_string()),
            AttributeValue::String(id) if !id.is_empty() => Some(id.clone()),
            _ => None,
        }
    }

    /// Returns an attribute.
    ///
    /// Declared fields that the API did not send read as `Null`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownAttribute`] if the field is neither
    /// held nor declared.
    pub fn get(&self, name: &str) -> Result<&AttributeValue, ResourceError> {
        if let Some(value) = self.attributes.get(name) {
            return Ok(value);
        }
        if self.descriptor.schema().contains(name) {
            return Ok(&NULL);
        }
        Err(ResourceError::UnknownAttribute {
            resource: self.descriptor.name(),
            attribute: name.to_string(),
        })
    }

    /// Returns an attribute if held.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Returns `true` if the attribute is held.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Assigns an updatable field, marking it dirty if the value changes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotUpdatable`] if the field is not declared
    /// updatable.
    pub fn set(&mut self, name: &str, value: impl Into<AttributeValue>) -> Result<(), ResourceError> {
        if !self.descriptor.is_updatable(name) {
            return Err(ResourceError::NotUpdatable {
                resource: self.descriptor.name(),
                attribute: name.to_string(),
            });
        }
        self.attributes.set(name, value.into());
        Ok(())
    }

    /// Returns the attribute store.
    #[must_use]
    pub const fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    /// Returns the dirty fields with their current values.
    #[must_use]
    pub fn changes(&self) -> Map<String, Value> {
        self.attributes.changes()
    }

    /// Returns `true` if any field has unsaved changes.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.attributes.is_dirty()
    }

    /// Discards unsaved changes.
    pub fn rollback(&mut self) {
        self.attributes.rollback();
    }

    /// Returns `true` once [`Entry::destroy`] succeeded.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Returns the current attributes as JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        self.attributes.to_json()
    }

    /// Returns the path of this entry relative to the API base URL.
    ///
    /// Uses the descriptor's override when declared, otherwise
    /// `{collection}/{id}`. `None` when the entry has no id.
    #[must_use]
    pub fn resource_url(&self) -> Option<String> {
        match self.descriptor.resource_url_override() {
            Some(url) => url(self),
            None => self
                .id()
                .map(|id| instance_path(self.descriptor.collection(), &id)),
        }
    }

    pub(crate) fn require_client(&self) -> Result<&Client, ResourceError> {
        self.client.as_ref().ok_or(ResourceError::MissingClient {
            resource: self.descriptor.name(),
        })
    }

    fn require(&self, capability: Capability, present: bool) -> Result<(), ResourceError> {
        if present {
            Ok(())
        } else {
            Err(ResourceError::CapabilityMissing {
                resource: self.descriptor.name(),
                capability,
            })
        }
    }

    /// Builds a request for an instance operation on this entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] if the entry has no resource URL.
    pub fn request(&self, operation: ResourceOperation) -> Result<RequestDescriptor, ResourceError> {
        let url = self.resource_url().ok_or(ResourceError::MissingId {
            resource: self.descriptor.name(),
            operation,
        })?;
        let subject = self.id().unwrap_or_else(|| url.clone());

        Ok(RequestDescriptor::new(
            operation.default_http_method(),
            join_path(&url, operation.suffix()),
            self.descriptor,
        )
        .subject(subject))
    }

    /// Dispatches a request through the entry's client.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingClient`] or any dispatch error.
    pub async fn prepare_request(&self, request: RequestDescriptor) -> Result<Outcome, ResourceError> {
        self.require_client()?.prepare_request(request).await
    }

    /// Sends `fields` as a PUT and reloads the entry from the response.
    ///
    /// Runs the descriptor's `before_update` hooks first and its
    /// `after_update` hooks once the changes are accepted. A failing hook
    /// aborts the call with its own error; earlier hooks are not undone and a
    /// failing `after_update` hook does not revert the server-side change.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::CapabilityMissing`] for kinds without
    /// updatable fields, [`ResourceError::InvalidInput`] on destroyed
    /// entries, a hook's error, or any dispatch error. Pending changes are
    /// kept when the request fails.
    pub async fn update(&mut self, fields: Map<String, Value>) -> Result<Vec<Action>, ResourceError> {
        let descriptor = self.descriptor;
        self.require(Capability::Updatable, descriptor.updatable_fields().next().is_some())?;
        if self.destroyed {
            return Err(ResourceError::InvalidInput {
                reason: format!("{} has been destroyed", descriptor.name()),
            });
        }

        for (index, hook) in descriptor.before_update_hooks().iter().enumerate() {
            tracing::trace!(resource = descriptor.name(), index, "running before_update hook");
            hook(self)?;
        }

        let request = self
            .request(ResourceOperation::Update)?
            .body(Value::Object(fields));
        let (actions, entry) = self.prepare_request(request).await?.into_parts();

        if let Some(entry) = entry {
            self.attributes = entry.attributes;
            self.response = entry.response;
        }
        self.attributes.accept_changes();

        for (index, hook) in descriptor.after_update_hooks().iter().enumerate() {
            tracing::trace!(resource = descriptor.name(), index, "running after_update hook");
            hook(self)?;
        }

        Ok(actions)
    }

    /// Sends the dirty fields as a PUT. See [`Entry::update`].
    ///
    /// # Errors
    ///
    /// See [`Entry::update`].
    pub async fn save(&mut self) -> Result<Vec<Action>, ResourceError> {
        let changes = self.changes();
        self.update(changes).await
    }

    /// Deletes the entry. Returns the action the API started, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::CapabilityMissing`] for kinds that are not
    /// destructible, or any dispatch error.
    pub async fn destroy(&mut self) -> Result<Option<Action>, ResourceError> {
        self.require(Capability::Destructible, self.descriptor.is_destructible())?;

        let request = self.request(ResourceOperation::Delete)?;
        let (actions, _) = self.prepare_request(request).await?.into_parts();
        self.destroyed = true;
        Ok(actions.into_iter().next())
    }

    /// Changes protection flags, e.g. `[("delete", true)]`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::CapabilityMissing`] for kinds that are not
    /// protectable, [`ResourceError::InvalidArgument`] for a mode outside the
    /// declared set (before any request is sent), or any dispatch error.
    pub async fn change_protection<I, K>(&mut self, modes: I) -> Result<Option<Action>, ResourceError>
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        let descriptor = self.descriptor;
        let allowed = descriptor.protection_modes().ok_or(ResourceError::CapabilityMissing {
            resource: descriptor.name(),
            capability: Capability::Protectable,
        })?;

        let mut body = Map::new();
        for (mode, enabled) in modes {
            let mode = mode.into();
            if !allowed.iter().any(|a| *a == mode) {
                return Err(ResourceError::InvalidArgument {
                    key: mode,
                    allowed: allowed.to_vec(),
                });
            }
            body.insert(mode, Value::Bool(enabled));
        }

        let request = self
            .request(ResourceOperation::ChangeProtection)?
            .body(Value::Object(body));
        let (actions, _) = self.prepare_request(request).await?.into_parts();
        Ok(actions.into_iter().next())
    }

    /// Returns the actions of this entry (`{resource_url}/actions`).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::CapabilityMissing`],
    /// [`ResourceError::MissingClient`] or [`ResourceError::MissingId`].
    pub fn actions(&self) -> Result<ActionResource, ResourceError> {
        self.require(Capability::Actions, self.descriptor.has_actions())?;
        let client = self.require_client()?.clone();
        let request = self.request(ResourceOperation::Actions)?;
        Ok(ActionResource::new(client, request.path()))
    }

    /// Fetches metrics and returns the `metrics` payload.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::CapabilityMissing`],
    /// [`ResourceError::InvalidInput`] for invalid parameters (before any
    /// request is sent), or any dispatch error.
    pub async fn metrics(&self, params: &MetricsParams) -> Result<Value, ResourceError> {
        self.require(Capability::Metrics, self.descriptor.has_metrics())?;
        let query = params.to_query()?;

        let request = self
            .request(ResourceOperation::Metrics)?
            .query(query)
            .autoload_action(false);

        self.require_client()?
            .prepare_request_with(request, |response| {
                Ok(response.body().get("metrics").cloned().unwrap_or(Value::Null))
            })
            .await
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.descriptor, other.descriptor) && self.attributes == other.attributes
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in self.attributes.iter() {
            map.entry(&name, value);
        }
        map.finish()?;
        if self.destroyed {
            f.write_str(" (destroyed)")?;
        }
        Ok(())
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Entry>();
};
