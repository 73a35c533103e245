//! Images (`/images`).
//!
//! `created_from` and `bound_to` reference servers; the API sends
//! `bound_to` as a bare id, which is kept as an integer.

use std::sync::OnceLock;

use crate::rest::resources::server;
use crate::rest::{FieldType, ResourceDescriptor};

/// The `image` kind.
pub fn descriptor() -> &'static ResourceDescriptor {
    static DESCRIPTOR: OnceLock<ResourceDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        ResourceDescriptor::builder("image", "images")
            .schema([
                ("id", FieldType::Integer),
                ("type", FieldType::String),
                ("status", FieldType::String),
                ("name", FieldType::String),
                ("description", FieldType::String),
                ("image_size", FieldType::Float),
                ("disk_size", FieldType::Float),
                ("created", FieldType::Time),
                ("created_from", FieldType::Resource(server::descriptor)),
                ("bound_to", FieldType::Resource(server::descriptor)),
                ("os_flavor", FieldType::String),
                ("os_version", FieldType::String),
                ("architecture", FieldType::String),
                ("rapid_deploy", FieldType::Boolean),
                ("deprecated", FieldType::Time),
                ("deleted", FieldType::Time),
                ("protection", FieldType::Object),
                ("labels", FieldType::Object),
            ])
            .updatable(["description", "type", "labels"])
            .destructible()
            .protectable(["delete"])
            .has_actions()
            .build()
    })
}
