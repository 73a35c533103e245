//! Lookup of resource kinds by name.
//!
//! [`Registry::global`] holds the built-in kinds and is initialized on first
//! use. Custom registries can be assembled with [`Registry::register`].

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::rest::descriptor::ResourceDescriptor;
use crate::rest::errors::ResourceError;
use crate::rest::resources;

/// Resource kinds keyed by singular name.
///
/// # Example
///
/// ```rust
/// use hcloud_entries::rest::Registry;
///
/// let registry = Registry::global();
/// assert_eq!(registry.get("server").unwrap().collection(), "servers");
/// assert_eq!(registry.by_collection("volumes").unwrap().name(), "volume");
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    descriptors: BTreeMap<&'static str, &'static ResourceDescriptor>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            descriptors: BTreeMap::new(),
        }
    }

    /// Returns the registry of built-in kinds.
    #[must_use]
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let mut registry = Self::new();
            for descriptor in resources::builtin() {
                let registered = registry.register(descriptor);
                debug_assert!(registered.is_ok(), "duplicate built-in kind {}", descriptor.name());
            }
            registry
        })
    }

    /// Adds a kind.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::AlreadyRegistered`] if a kind with the same
    /// singular name is present.
    pub fn register(&mut self, descriptor: &'static ResourceDescriptor) -> Result<(), ResourceError> {
        if self.descriptors.contains_key(descriptor.name()) {
            return Err(ResourceError::AlreadyRegistered {
                resource: descriptor.name(),
            });
        }
        self.descriptors.insert(descriptor.name(), descriptor);
        Ok(())
    }

    /// Looks up a kind by singular name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static ResourceDescriptor> {
        self.descriptors.get(name).copied()
    }

    /// Looks up a kind by collection name.
    #[must_use]
    pub fn by_collection(&self, collection: &str) -> Option<&'static ResourceDescriptor> {
        self.descriptors
            .values()
            .copied()
            .find(|d| d.collection() == collection)
    }

    /// Iterates over registered singular names in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.keys().copied()
    }

    /// Returns the number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::server;

    #[test]
    fn test_global_registry_contains_builtins() {
        let registry = Registry::global();
        for name in ["action", "datacenter", "firewall", "image", "location", "server", "volume"] {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_builtin_kinds_register_without_conflicts() {
        let mut registry = Registry::new();
        for descriptor in resources::builtin() {
            registry.register(descriptor).unwrap();
        }
        assert_eq!(registry.len(), resources::builtin().len());
    }

    #[test]
    fn test_global_registry_returns_same_descriptor() {
        assert!(std::ptr::eq(Registry::global().get("server").unwrap(), server::descriptor()));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = Registry::new();
        registry.register(server::descriptor()).unwrap();
        assert!(matches!(
            registry.register(server::descriptor()),
            Err(ResourceError::AlreadyRegistered { resource: "server" })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_names() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.get("server").is_none());
        assert!(registry.by_collection("servers").is_none());
    }
}
