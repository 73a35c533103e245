//! Field type declarations.
//!
//! A [`Schema`] maps field names to a [`FieldType`] that tells the loader how
//! to convert the raw JSON value. Schemas only ever grow: declaring a field
//! again replaces its type, nothing is removed.
//!
//! # Example
//!
//! ```rust
//! use hcloud_entries::rest::{FieldType, Schema};
//!
//! let mut schema = Schema::new();
//! schema.merge([("id", FieldType::Integer), ("name", FieldType::String)]);
//! schema.merge([("labels", FieldType::Object)]);
//!
//! assert_eq!(schema.len(), 3);
//! assert_eq!(schema.get("name"), Some(FieldType::String));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::rest::descriptor::ResourceDescriptor;

/// Lazily resolved reference to another resource kind.
///
/// A function pointer rather than a reference so that resource kinds can
/// refer to each other (and to themselves) before either is initialized.
pub type DescriptorRef = fn() -> &'static ResourceDescriptor;

/// How a raw attribute value is interpreted.
#[derive(Clone, Copy)]
pub enum FieldType {
    /// A JSON string.
    String,
    /// A JSON integer.
    Integer,
    /// Any JSON number.
    Float,
    /// A JSON boolean.
    Boolean,
    /// An RFC 3339 timestamp string.
    Time,
    /// A JSON object kept as-is (e.g. `labels`).
    Object,
    /// Any value, converted without a declared type.
    Any,
    /// A nested entry of another resource kind. A bare integer is kept as
    /// an unexpanded id reference.
    Resource(DescriptorRef),
    /// A list whose elements all have the inner type.
    List(&'static FieldType),
}

impl FieldType {
    /// Returns a short description used in error messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Time => "timestamp",
            Self::Object => "object",
            Self::Any => "any",
            Self::Resource(_) => "resource object or id",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(descriptor) => write!(f, "Resource({})", descriptor().name()),
            Self::List(inner) => f.debug_tuple("List").field(inner).finish(),
            other => f.write_str(other.describe()),
        }
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Resource(a), Self::Resource(b)) => std::ptr::eq(a(), b()),
            (Self::List(a), Self::List(b)) => a == b,
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

/// The declared fields of a resource kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    fields: BTreeMap<String, FieldType>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Adds (or redeclares) fields. Existing fields are never removed.
    pub fn merge<I, K>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (K, FieldType)>,
        K: Into<String>,
    {
        for (name, field_type) in fields {
            self.fields.insert(name.into(), field_type);
        }
    }

    /// Returns the declared type of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    /// Returns `true` if the field is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates over declared fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_accumulates_and_redeclares() {
        let mut schema = Schema::new();
        schema.merge([("id", FieldType::Integer), ("name", FieldType::String)]);
        schema.merge([("name", FieldType::Any), ("created", FieldType::Time)]);

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.get("id"), Some(FieldType::Integer));
        assert_eq!(schema.get("name"), Some(FieldType::Any));
        assert!(schema.contains("created"));
        assert!(!schema.contains("status"));
    }

    #[test]
    fn test_list_types_compare_by_inner_type() {
        assert_eq!(FieldType::List(&FieldType::String), FieldType::List(&FieldType::String));
        assert_ne!(FieldType::List(&FieldType::String), FieldType::List(&FieldType::Integer));
        assert_ne!(FieldType::String, FieldType::Integer);
    }

    #[test]
    fn test_fields_iterate_in_name_order() {
        let mut schema = Schema::new();
        schema.merge([("status", FieldType::String), ("id", FieldType::Integer)]);
        let names: Vec<_> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["id", "status"]);
    }
}
