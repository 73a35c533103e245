//! Servers (`/servers`).
//!
//! Servers are the richest kind: they can be renamed and relabelled,
//! deleted, protected against deletion and rebuild, and expose both their
//! action history and CPU/disk/network metrics.
//!
//! # Example
//!
//! ```rust,ignore
//! use hcloud_entries::rest::MetricsParams;
//!
//! let mut server = client.servers().find(42).await?;
//! server.set("labels", serde_json::json!({"env": "prod"}))?;
//! server.save().await?;
//!
//! server.change_protection([("delete", true)]).await?;
//!
//! let cpu = server
//!     .metrics(&MetricsParams::new().metric_type("cpu").start(start).end(end).step(60))
//!     .await?;
//! ```

use std::sync::OnceLock;

use crate::rest::resources::{datacenter, image};
use crate::rest::{FieldType, ResourceDescriptor};

/// The `server` kind.
pub fn descriptor() -> &'static ResourceDescriptor {
    static DESCRIPTOR: OnceLock<ResourceDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        ResourceDescriptor::builder("server", "servers")
            .schema([
                ("id", FieldType::Integer),
                ("name", FieldType::String),
                ("status", FieldType::String),
                ("created", FieldType::Time),
                ("public_net", FieldType::Object),
                ("private_net", FieldType::List(&FieldType::Object)),
                ("server_type", FieldType::Object),
                ("datacenter", FieldType::Resource(datacenter::descriptor)),
                ("image", FieldType::Resource(image::descriptor)),
                ("iso", FieldType::Object),
                ("rescue_enabled", FieldType::Boolean),
                ("locked", FieldType::Boolean),
                ("backup_window", FieldType::String),
                ("outgoing_traffic", FieldType::Integer),
                ("ingoing_traffic", FieldType::Integer),
                ("included_traffic", FieldType::Integer),
                ("primary_disk_size", FieldType::Integer),
                ("protection", FieldType::Object),
                ("labels", FieldType::Object),
                ("volumes", FieldType::List(&FieldType::Integer)),
                ("load_balancers", FieldType::List(&FieldType::Integer)),
                ("placement_group", FieldType::Object),
            ])
            .updatable(["name", "labels"])
            .destructible()
            .protectable(["delete", "rebuild"])
            .has_actions()
            .has_metrics()
            .build()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::{AttributeValue, Entry};
    use serde_json::json;

    #[test]
    fn test_server_capabilities() {
        let descriptor = descriptor();
        assert!(descriptor.is_updatable("name"));
        assert!(descriptor.is_updatable("labels"));
        assert!(!descriptor.is_updatable("status"));
        assert!(descriptor.is_destructible());
        assert!(descriptor.has_actions());
        assert!(descriptor.has_metrics());
    }

    #[test]
    fn test_server_loads_nested_kinds() {
        let raw = json!({
            "id": 42,
            "name": "web-1",
            "created": "2016-01-30T23:50:00+00:00",
            "datacenter": {"id": 4, "name": "fsn1-dc14", "location": {"id": 1, "name": "fsn1"}},
            "image": {"id": 4711, "name": "ubuntu-24.04", "created_from": null, "bound_to": null},
            "volumes": [1, 2],
            "labels": {"env": "prod"}
        });
        let server = Entry::from_raw(descriptor(), None, &raw).unwrap();

        let image = server.get("image").unwrap().as_entry().unwrap();
        assert_eq!(image.descriptor().name(), "image");
        assert!(image.get("bound_to").unwrap().is_null());
        assert!(server.get("created").unwrap().as_time().is_some());
        assert_eq!(
            server.get("volumes").unwrap().as_list().unwrap(),
            &[AttributeValue::Integer(1), AttributeValue::Integer(2)][..]
        );
    }
}
