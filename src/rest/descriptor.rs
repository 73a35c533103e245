//! Resource kind declarations.
//!
//! A [`ResourceDescriptor`] describes one kind of API object: its schema,
//! which fields can be updated, which optional capabilities it has and the
//! hooks that run around updates. Descriptors are built once with
//! [`ResourceDescriptorBuilder`] and stored in a `static`:
//!
//! ```rust
//! use std::sync::OnceLock;
//! use hcloud_entries::rest::{FieldType, ResourceDescriptor};
//!
//! pub fn descriptor() -> &'static ResourceDescriptor {
//!     static DESCRIPTOR: OnceLock<ResourceDescriptor> = OnceLock::new();
//!     DESCRIPTOR.get_or_init(|| {
//!         ResourceDescriptor::builder("ssh_key", "ssh_keys")
//!             .schema([
//!                 ("id", FieldType::Integer),
//!                 ("name", FieldType::String),
//!                 ("created", FieldType::Time),
//!             ])
//!             .updatable(["name", "labels"])
//!             .destructible()
//!             .build()
//!     })
//! }
//!
//! assert!(descriptor().is_updatable("name"));
//! assert!(!descriptor().has_metrics());
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::rest::entry::Entry;
use crate::rest::errors::ResourceError;
use crate::rest::schema::{FieldType, Schema};

/// A hook run before or after an update. An error aborts the update.
pub type Hook = Arc<dyn Fn(&mut Entry) -> Result<(), ResourceError> + Send + Sync>;

/// Computes the resource URL of an entry, replacing `{collection}/{id}`.
pub type ResourceUrlFn = Arc<dyn Fn(&Entry) -> Option<String> + Send + Sync>;

/// Declaration of a resource kind.
pub struct ResourceDescriptor {
    name: &'static str,
    collection: &'static str,
    schema: Schema,
    updatable: BTreeSet<String>,
    destructible: bool,
    protection_modes: Option<Vec<String>>,
    has_actions: bool,
    has_metrics: bool,
    before_update: Vec<Hook>,
    after_update: Vec<Hook>,
    resource_url: Option<ResourceUrlFn>,
}

impl ResourceDescriptor {
    /// Starts a declaration.
    ///
    /// `name` is the singular response key (`server`), `collection` the
    /// plural key and path segment (`servers`).
    #[must_use]
    pub fn builder(name: &'static str, collection: &'static str) -> ResourceDescriptorBuilder {
        ResourceDescriptorBuilder {
            descriptor: Self {
                name,
                collection,
                schema: Schema::new(),
                updatable: BTreeSet::new(),
                destructible: false,
                protection_modes: None,
                has_actions: false,
                has_metrics: false,
                before_update: Vec::new(),
                after_update: Vec::new(),
                resource_url: None,
            },
        }
    }

    /// Returns the singular name (`server`).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the collection name (`servers`).
    #[must_use]
    pub const fn collection(&self) -> &'static str {
        self.collection
    }

    /// Returns the declared fields.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns `true` if the field may be assigned.
    #[must_use]
    pub fn is_updatable(&self, field: &str) -> bool {
        self.updatable.contains(field)
    }

    /// Iterates over updatable field names.
    pub fn updatable_fields(&self) -> impl Iterator<Item = &str> {
        self.updatable.iter().map(String::as_str)
    }

    /// Returns `true` if entries can be deleted.
    #[must_use]
    pub const fn is_destructible(&self) -> bool {
        self.destructible
    }

    /// Returns the protection modes, if the kind is protectable.
    #[must_use]
    pub fn protection_modes(&self) -> Option<&[String]> {
        self.protection_modes.as_deref()
    }

    /// Returns `true` if entries expose nested actions.
    #[must_use]
    pub const fn has_actions(&self) -> bool {
        self.has_actions
    }

    /// Returns `true` if entries expose metrics.
    #[must_use]
    pub const fn has_metrics(&self) -> bool {
        self.has_metrics
    }

    /// Returns the hooks run before an update, in declaration order.
    #[must_use]
    pub fn before_update_hooks(&self) -> &[Hook] {
        &self.before_update
    }

    /// Returns the hooks run after an update, in declaration order.
    #[must_use]
    pub fn after_update_hooks(&self) -> &[Hook] {
        &self.after_update
    }

    /// Returns the resource URL override, if declared.
    #[must_use]
    pub fn resource_url_override(&self) -> Option<&ResourceUrlFn> {
        self.resource_url.as_ref()
    }
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("name", &self.name)
            .field("collection", &self.collection)
            .field("fields", &self.schema.len())
            .field("updatable", &self.updatable)
            .field("destructible", &self.destructible)
            .field("protection_modes", &self.protection_modes)
            .field("has_actions", &self.has_actions)
            .field("has_metrics", &self.has_metrics)
            .field("before_update", &self.before_update.len())
            .field("after_update", &self.after_update.len())
            .field("resource_url", &self.resource_url.is_some())
            .finish()
    }
}

/// Builder for [`ResourceDescriptor`].
///
/// Every method accumulates; calling `schema` twice merges both field sets.
#[must_use]
pub struct ResourceDescriptorBuilder {
    descriptor: ResourceDescriptor,
}

impl ResourceDescriptorBuilder {
    /// Declares fields.
    pub fn schema<I, K>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldType)>,
        K: Into<String>,
    {
        self.descriptor.schema.merge(fields);
        self
    }

    /// Marks fields as assignable.
    pub fn updatable<I, K>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.descriptor
            .updatable
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Enables `destroy`.
    pub fn destructible(mut self) -> Self {
        self.descriptor.destructible = true;
        self
    }

    /// Enables `change_protection` with the given modes.
    pub fn protectable<I, K>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.descriptor
            .protection_modes
            .get_or_insert_with(Vec::new)
            .extend(modes.into_iter().map(Into::into));
        self
    }

    /// Enables the nested action collection.
    pub fn has_actions(mut self) -> Self {
        self.descriptor.has_actions = true;
        self
    }

    /// Enables the metrics endpoint.
    pub fn has_metrics(mut self) -> Self {
        self.descriptor.has_metrics = true;
        self
    }

    /// Appends a hook run before each update.
    pub fn before_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Entry) -> Result<(), ResourceError> + Send + Sync + 'static,
    {
        self.descriptor.before_update.push(Arc::new(hook));
        self
    }

    /// Appends a hook run after each successful update.
    pub fn after_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Entry) -> Result<(), ResourceError> + Send + Sync + 'static,
    {
        self.descriptor.after_update.push(Arc::new(hook));
        self
    }

    /// Overrides the resource URL. Returning `None` means the entry has no
    /// addressable URL yet.
    pub fn resource_url<F>(mut self, url: F) -> Self
    where
        F: Fn(&Entry) -> Option<String> + Send + Sync + 'static,
    {
        self.descriptor.resource_url = Some(Arc::new(url));
        self
    }

    /// Finishes the declaration.
    #[must_use]
    pub fn build(self) -> ResourceDescriptor {
        self.descriptor
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceDescriptor>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_have_no_capabilities() {
        let descriptor = ResourceDescriptor::builder("location", "locations").build();

        assert_eq!(descriptor.name(), "location");
        assert_eq!(descriptor.collection(), "locations");
        assert!(descriptor.schema().is_empty());
        assert!(!descriptor.is_destructible());
        assert!(descriptor.protection_modes().is_none());
        assert!(!descriptor.has_actions());
        assert!(!descriptor.has_metrics());
        assert_eq!(descriptor.updatable_fields().count(), 0);
        assert!(descriptor.resource_url_override().is_none());
    }

    #[test]
    fn test_builder_accumulates_declarations() {
        let descriptor = ResourceDescriptor::builder("server", "servers")
            .schema([("id", FieldType::Integer)])
            .schema([("name", FieldType::String)])
            .updatable(["name"])
            .updatable(["labels"])
            .protectable(["delete"])
            .protectable(["rebuild"])
            .destructible()
            .has_actions()
            .has_metrics()
            .build();

        assert_eq!(descriptor.schema().len(), 2);
        assert!(descriptor.is_updatable("name"));
        assert!(descriptor.is_updatable("labels"));
        assert!(!descriptor.is_updatable("id"));
        assert_eq!(
            descriptor.protection_modes(),
            Some(&["delete".to_string(), "rebuild".to_string()][..])
        );
        assert!(descriptor.is_destructible());
        assert!(descriptor.has_actions());
        assert!(descriptor.has_metrics());
    }

    #[test]
    fn test_hooks_keep_declaration_order() {
        let descriptor = ResourceDescriptor::builder("server", "servers")
            .before_update(|_| Ok(()))
            .before_update(|_| Err(ResourceError::InvalidInput { reason: "second".to_string() }))
            .after_update(|_| Ok(()))
            .build();

        assert_eq!(descriptor.before_update_hooks().len(), 2);
        assert_eq!(descriptor.after_update_hooks().len(), 1);
    }

    #[test]
    fn test_debug_output_names_the_kind() {
        let descriptor = ResourceDescriptor::builder("volume", "volumes").build();
        let debug = format!("{descriptor:?}");
        assert!(debug.contains("volume"));
        assert!(debug.contains("volumes"));
    }
}
