//! Firewalls (`/firewalls`).
//!
//! Rules and the resources a firewall is applied to are kept as raw JSON
//! objects.

use std::sync::OnceLock;

use crate::rest::{FieldType, ResourceDescriptor};

/// The `firewall` kind.
pub fn descriptor() -> &'static ResourceDescriptor {
    static DESCRIPTOR: OnceLock<ResourceDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        ResourceDescriptor::builder("firewall", "firewalls")
            .schema([
                ("id", FieldType::Integer),
                ("name", FieldType::String),
                ("rules", FieldType::List(&FieldType::Object)),
                ("applied_to", FieldType::List(&FieldType::Object)),
                ("labels", FieldType::Object),
                ("created", FieldType::Time),
            ])
            .updatable(["name", "labels"])
            .destructible()
            .has_actions()
            .build()
    })
}
