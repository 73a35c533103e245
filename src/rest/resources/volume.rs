//! Volumes (`/volumes`).

use std::sync::OnceLock;

use crate::rest::resources::{location, server};
use crate::rest::{FieldType, ResourceDescriptor};

/// The `volume` kind.
pub fn descriptor() -> &'static ResourceDescriptor {
    static DESCRIPTOR: OnceLock<ResourceDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        ResourceDescriptor::builder("volume", "volumes")
            .schema([
                ("id", FieldType::Integer),
                ("name", FieldType::String),
                ("size", FieldType::Integer),
                ("status", FieldType::String),
                ("format", FieldType::String),
                ("linux_device", FieldType::String),
                ("created", FieldType::Time),
                ("server", FieldType::Resource(server::descriptor)),
                ("location", FieldType::Resource(location::descriptor)),
                ("protection", FieldType::Object),
                ("labels", FieldType::Object),
            ])
            .updatable(["name", "labels"])
            .destructible()
            .protectable(["delete"])
            .has_actions()
            .build()
    })
}
