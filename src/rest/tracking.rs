//! Dirty tracking for partial updates.
//!
//! [`AttributeStore`] holds the current attribute values of an entry, a
//! snapshot taken when the entry was loaded or last saved, and the set of
//! fields that differ from that snapshot. Only dirty fields are sent when an
//! entry is saved.
//!
//! # How It Works
//!
//! A field is marked dirty when it is set to a value different from its
//! current one; setting it back to the snapshot value clears the mark.
//! [`AttributeStore::rollback`] restores dirty fields from the snapshot and
//! [`AttributeStore::accept_changes`] takes a new snapshot.
//!
//! # Example
//!
//! ```rust
//! use hcloud_entries::rest::{AttributeMap, AttributeStore};
//!
//! let mut loaded = AttributeMap::new();
//! loaded.insert("name".to_string(), "web-1".into());
//! let mut store = AttributeStore::loaded(loaded);
//! assert!(!store.is_dirty());
//!
//! store.set("name", "web-2".into());
//! assert!(store.is_changed("name"));
//! assert_eq!(store.changes()["name"], "web-2");
//!
//! store.rollback();
//! assert!(!store.is_dirty());
//! assert_eq!(store.get("name").and_then(|v| v.as_str()), Some("web-1"));
//! ```

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::rest::loader::{AttributeMap, AttributeValue};

/// Current attributes plus their last-saved snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    current: AttributeMap,
    snapshot: AttributeMap,
    dirty: BTreeSet<String>,
}

impl AttributeStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: AttributeMap::new(),
            snapshot: AttributeMap::new(),
            dirty: BTreeSet::new(),
        }
    }

    /// Creates a clean store from freshly loaded attributes.
    #[must_use]
    pub fn loaded(attributes: AttributeMap) -> Self {
        Self {
            snapshot: attributes.clone(),
            current: attributes,
            dirty: BTreeSet::new(),
        }
    }

    /// Replaces all attributes with freshly loaded ones. The store is
    /// clean afterwards.
    pub fn replace(&mut self, attributes: AttributeMap) {
        *self = Self::loaded(attributes);
    }

    /// Returns the current value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.current.get(name)
    }

    /// Returns `true` if the field holds a value (possibly `null`).
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.current.contains_key(name)
    }

    /// Stores a value, updating the dirty set.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set(&mut self, name: &str, value: AttributeValue) -> bool {
        if self.current.get(name) == Some(&value) {
            return false;
        }

        self.dirty.insert(name.to_string());
        self.current.insert(name.to_string(), value);

        if self.snapshot.get(name) == self.current.get(name) {
            self.dirty.remove(name);
        }
        true
    }

    /// Returns `true` if any field differs from the snapshot.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Returns `true` if the field differs from the snapshot.
    #[must_use]
    pub fn is_changed(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    /// Iterates over dirty field names in name order.
    pub fn changed_fields(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    /// Returns the current values of dirty fields as a JSON object.
    #[must_use]
    pub fn changes(&self) -> Map<String, Value> {
        self.dirty
            .iter()
            .map(|name| {
                let value = self.current.get(name).map_or(Value::Null, AttributeValue::to_json);
                (name.clone(), value)
            })
            .collect()
    }

    /// Restores dirty fields from the snapshot and clears the dirty set.
    pub fn rollback(&mut self) {
        for name in std::mem::take(&mut self.dirty) {
            match self.snapshot.get(&name) {
                Some(value) => {
                    self.current.insert(name, value.clone());
                }
                None => {
                    self.current.remove(&name);
                }
            }
        }
    }

    /// Takes the current values as the new snapshot.
    pub fn accept_changes(&mut self) {
        self.snapshot = self.current.clone();
        self.dirty.clear();
    }

    /// Iterates over current attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.current.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of attributes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Returns `true` if no attribute is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Returns the current attributes as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.current
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}
