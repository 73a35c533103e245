//! Datacenters (`/datacenters`).
//!
//! A datacenter embeds its [`location`](super::location) as a nested entry.

use std::sync::OnceLock;

use crate::rest::resources::location;
use crate::rest::{FieldType, ResourceDescriptor};

/// The `datacenter` kind. Read-only.
pub fn descriptor() -> &'static ResourceDescriptor {
    static DESCRIPTOR: OnceLock<ResourceDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        ResourceDescriptor::builder("datacenter", "datacenters")
            .schema([
                ("id", FieldType::Integer),
                ("name", FieldType::String),
                ("description", FieldType::String),
                ("location", FieldType::Resource(location::descriptor)),
                ("server_types", FieldType::Object),
            ])
            .build()
    })
}
