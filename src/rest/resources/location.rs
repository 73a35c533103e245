//! Locations (`/locations`).

use std::sync::OnceLock;

use crate::rest::{FieldType, ResourceDescriptor};

/// The `location` kind. Read-only.
pub fn descriptor() -> &'static ResourceDescriptor {
    static DESCRIPTOR: OnceLock<ResourceDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        ResourceDescriptor::builder("location", "locations")
            .schema([
                ("id", FieldType::Integer),
                ("name", FieldType::String),
                ("description", FieldType::String),
                ("country", FieldType::String),
                ("city", FieldType::String),
                ("latitude", FieldType::Float),
                ("longitude", FieldType::Float),
                ("network_zone", FieldType::String),
            ])
            .build()
    })
}
