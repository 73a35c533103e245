//! Typed loading of raw attributes.
//!
//! [`ResourceLoader`] converts the JSON object of an API response into an
//! [`AttributeMap`] according to a [`Schema`]:
//!
//! - timestamps become [`AttributeValue::Time`]
//! - nested resource objects become [`AttributeValue::Entry`], loaded with
//!   that resource's own schema and sharing the caller's client
//! - a bare integer where a resource is declared stays an integer id
//! - lists convert element-wise
//! - undeclared fields are kept, converted without a type
//!
//! A `null` value is kept as [`AttributeValue::Null`] for every type.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::rest::entry::Entry;
use crate::rest::errors::ResourceError;
use crate::rest::schema::{FieldType, Schema};
use crate::rest::Client;

/// Attribute name to loaded value.
pub type AttributeMap = BTreeMap<String, AttributeValue>;

/// A loaded attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    /// JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer (also used for unexpanded resource ids).
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// A parsed timestamp.
    Time(DateTime<Utc>),
    /// A nested entry.
    Entry(Box<Entry>),
    /// A list of values.
    List(Vec<AttributeValue>),
    /// An object (or any other value) kept as raw JSON.
    Json(Value),
}

impl AttributeValue {
    /// Converts a JSON value without type information.
    ///
    /// Objects stay raw JSON; arrays convert element-wise.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or_default()), Self::Integer),
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(_) => Self::Json(value.clone()),
        }
    }

    /// Converts back to JSON for request bodies.
    ///
    /// Timestamps serialize as RFC 3339; nested entries as their current
    /// attributes.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::String(s) => Value::String(s.clone()),
            Self::Time(t) => Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Entry(entry) => entry.to_json(),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Json(value) => value.clone(),
        }
    }

    /// Returns `true` for [`AttributeValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number as a float, if this is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the timestamp, if this is one.
    #[must_use]
    pub const fn as_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Time(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the nested entry, if this is one.
    #[must_use]
    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            Self::Entry(entry) => Some(entry.as_ref()),
            _ => None,
        }
    }

    /// Returns the list, if this is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Returns the raw JSON, if this is an untyped object.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value)
    }
}

impl From<Entry> for AttributeValue {
    fn from(value: Entry) -> Self {
        Self::Entry(Box::new(value))
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(_) => Self::Json(value),
            other => Self::from_json(&other),
        }
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Converts raw attribute objects according to a schema.
#[derive(Clone, Copy, Debug)]
pub struct ResourceLoader<'a> {
    resource: &'static str,
    schema: &'a Schema,
    client: Option<&'a Client>,
}

impl<'a> ResourceLoader<'a> {
    /// Creates a loader for the named resource kind.
    ///
    /// Nested entries are bound to `client`.
    #[must_use]
    pub const fn new(resource: &'static str, schema: &'a Schema, client: Option<&'a Client>) -> Self {
        Self {
            resource,
            schema,
            client,
        }
    }

    /// Loads a raw attribute object.
    ///
    /// Returns `Ok(None)` for `null` input, leaving the caller's state as is.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidAttribute`] if the input is not an
    /// object or a declared field has a value of the wrong JSON type.
    pub fn load(&self, raw: &Value) -> Result<Option<AttributeMap>, ResourceError> {
        let object = match raw {
            Value::Null => return Ok(None),
            Value::Object(object) => object,
            other => {
                return Err(ResourceError::InvalidAttribute {
                    resource: self.resource,
                    field: String::new(),
                    expected: "object",
                    found: json_type(other),
                })
            }
        };

        let mut attributes = AttributeMap::new();
        for (name, value) in object {
            let loaded = match self.schema.get(name) {
                Some(field_type) => self.convert(name, field_type, value)?,
                None => AttributeValue::from_json(value),
            };
            attributes.insert(name.clone(), loaded);
        }
        Ok(Some(attributes))
    }

    fn convert(&self, field: &str, field_type: FieldType, value: &Value) -> Result<AttributeValue, ResourceError> {
        if value.is_null() {
            return Ok(AttributeValue::Null);
        }

        let converted = match (field_type, value) {
            (FieldType::String, Value::String(s)) => Some(AttributeValue::String(s.clone())),
            (FieldType::Integer, Value::Number(n)) => n.as_i64().map(AttributeValue::Integer),
            (FieldType::Float, Value::Number(n)) => n.as_f64().map(AttributeValue::Float),
            (FieldType::Boolean, Value::Bool(b)) => Some(AttributeValue::Bool(*b)),
            (FieldType::Time, Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| AttributeValue::Time(t.with_timezone(&Utc))),
            (FieldType::Object, Value::Object(_)) => Some(AttributeValue::Json(value.clone())),
            (FieldType::Any, _) => Some(AttributeValue::from_json(value)),
            (FieldType::Resource(_), Value::Number(n)) => n.as_i64().map(AttributeValue::Integer),
            (FieldType::Resource(descriptor), Value::Object(_)) => {
                let entry = Entry::from_raw(descriptor(), self.client.cloned(), value).map_err(
                    |e| match e {
                        ResourceError::InvalidAttribute {
                            field: nested,
                            expected,
                            found,
                            ..
                        } => ResourceError::InvalidAttribute {
                            resource: self.resource,
                            field: format!("{field}.{nested}"),
                            expected,
                            found,
                        },
                        other => other,
                    },
                )?;
                Some(AttributeValue::Entry(Box::new(entry)))
            }
            (FieldType::List(inner), Value::Array(items)) => {
                let items = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.convert(&format!("{field}[{i}]"), *inner, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Some(AttributeValue::List(items))
            }
            _ => None,
        };

        converted.ok_or_else(|| ResourceError::InvalidAttribute {
            resource: self.resource,
            field: field.to_string(),
            expected: field_type.describe(),
            found: json_type(value),
        })
    }
}
