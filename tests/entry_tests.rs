//! Integration tests for entry operations.
//!
//! These tests drive entries through an in-memory transport and verify the
//! requests that are sent and how responses are absorbed.

mod common;

use std::sync::{Mutex, OnceLock};

use chrono::{TimeZone, Utc};
use common::{client, MockTransport};
use hcloud_entries::clients::HttpMethod;
use hcloud_entries::rest::{
    ActionStatus, Capability, FieldType, MetricsParams, ResourceDescriptor, ResourceError,
};
use hcloud_entries::Entry;
use serde_json::json;

fn server_json() -> serde_json::Value {
    json!({"id": 42, "name": "web-1", "status": "running", "labels": {"env": "prod"}})
}

fn action_json(id: i64, command: &str) -> serde_json::Value {
    json!({
        "id": id,
        "command": command,
        "status": "running",
        "progress": 0,
        "started": "2016-01-30T23:50:00+00:00",
        "finished": null,
        "resources": [{"id": 42, "type": "server"}],
        "error": null
    })
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_save_sends_only_dirty_fields_and_reloads() {
    let transport = MockTransport::new();
    let client = client(&transport);
    transport.respond(200, json!({"server": server_json()}));

    let mut server = client.servers().find(42).await.unwrap();
    assert_eq!(transport.last_request().http_method, HttpMethod::Get);
    assert_eq!(transport.last_request().path, "servers/42");

    server.set("name", "web-2").unwrap();
    assert!(server.is_changed());

    transport.respond(
        200,
        json!({"server": {"id": 42, "name": "web-2", "status": "running", "labels": {"env": "prod"}}}),
    );
    let actions = server.save().await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.http_method, HttpMethod::Put);
    assert_eq!(request.path, "servers/42");
    assert_eq!(request.body, Some(json!({"name": "web-2"})));

    assert!(actions.is_empty());
    assert!(!server.is_changed());
    assert_eq!(server.get("name").unwrap().as_str(), Some("web-2"));
}

#[tokio::test]
async fn test_update_returns_embedded_actions() {
    let transport = MockTransport::new();
    let client = client(&transport);
    let mut server = client.servers().build(&server_json()).unwrap();

    server.set("labels", json!({"env": "staging"})).unwrap();
    transport.respond(
        200,
        json!({"server": server_json(), "action": action_json(7, "update_server")}),
    );

    let actions = server.save().await.unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].command(), Some("update_server"));
    assert_eq!(actions[0].status(), ActionStatus::Running);
    assert!(actions[0].client().is_some());
}

#[tokio::test]
async fn test_rejected_update_keeps_pending_changes() {
    let transport = MockTransport::new();
    let client = client(&transport);
    let mut server = client.servers().build(&server_json()).unwrap();

    server.set("name", "x".repeat(100)).unwrap();
    transport.respond_with_headers(
        422,
        json!({"error": {
            "code": "invalid_input",
            "message": "invalid input in field 'name'",
            "details": {"fields": [{"name": "name", "messages": ["is too long"]}]}
        }}),
        &[("X-Request-Id", "req-123")],
    );

    let error = server.save().await.unwrap_err();
    assert_eq!(error.request_id(), Some("req-123"));
    match error {
        ResourceError::ValidationFailed { fields, .. } => {
            assert_eq!(fields["name"], vec!["is too long".to_string()]);
        }
        other => panic!("Expected ValidationFailed, got {other:?}"),
    }
    assert!(server.is_changed());
}

// ============================================================================
// Hooks
// ============================================================================

static HOOK_LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

fn hooked_descriptor() -> &'static ResourceDescriptor {
    static DESCRIPTOR: OnceLock<ResourceDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        ResourceDescriptor::builder("widget", "widgets")
            .schema([("id", FieldType::Integer), ("name", FieldType::String)])
            .updatable(["name"])
            .before_update(|_| {
                HOOK_LOG.lock().unwrap().push("before-1");
                Ok(())
            })
            .before_update(|entry| {
                HOOK_LOG.lock().unwrap().push("before-2");
                assert!(entry.is_changed());
                Ok(())
            })
            .after_update(|entry| {
                HOOK_LOG.lock().unwrap().push("after");
                assert!(!entry.is_changed());
                Ok(())
            })
            .build()
    })
}

fn rejecting_descriptor() -> &'static ResourceDescriptor {
    static DESCRIPTOR: OnceLock<ResourceDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        ResourceDescriptor::builder("gadget", "gadgets")
            .schema([("id", FieldType::Integer), ("name", FieldType::String)])
            .updatable(["name"])
            .before_update(|entry| match entry.get("name")?.as_str() {
                Some(name) if name.is_empty() => Err(ResourceError::InvalidInput {
                    reason: "name must not be empty".to_string(),
                }),
                _ => Ok(()),
            })
            .build()
    })
}

fn failing_after_descriptor() -> &'static ResourceDescriptor {
    static DESCRIPTOR: OnceLock<ResourceDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        ResourceDescriptor::builder("gizmo", "gizmos")
            .schema([("id", FieldType::Integer), ("name", FieldType::String)])
            .updatable(["name"])
            .after_update(|_| {
                Err(ResourceError::InvalidInput {
                    reason: "post-processing failed".to_string(),
                })
            })
            .build()
    })
}

#[tokio::test]
async fn test_hooks_run_in_declaration_order_around_the_request() {
    let transport = MockTransport::new();
    let client = client(&transport);
    let mut widget = client
        .resource(hooked_descriptor())
        .build(&json!({"id": 1, "name": "a"}))
        .unwrap();

    widget.set("name", "b").unwrap();
    transport.respond(200, json!({"widget": {"id": 1, "name": "b"}}));
    widget.save().await.unwrap();

    assert_eq!(*HOOK_LOG.lock().unwrap(), vec!["before-1", "before-2", "after"]);
    assert_eq!(transport.last_request().path, "widgets/1");
}

#[tokio::test]
async fn test_failing_before_hook_aborts_without_request() {
    let transport = MockTransport::new();
    let client = client(&transport);
    let mut gadget = client
        .resource(rejecting_descriptor())
        .build(&json!({"id": 1, "name": "a"}))
        .unwrap();

    gadget.set("name", "").unwrap();
    let result = gadget.save().await;

    assert!(matches!(result, Err(ResourceError::InvalidInput { .. })));
    assert_eq!(transport.request_count(), 0);
    assert!(gadget.is_changed());
}

#[tokio::test]
async fn test_failing_after_hook_keeps_the_server_side_change() {
    let transport = MockTransport::new();
    let client = client(&transport);
    let mut gizmo = client
        .resource(failing_after_descriptor())
        .build(&json!({"id": 3, "name": "a"}))
        .unwrap();

    gizmo.set("name", "b").unwrap();
    transport.respond(200, json!({"gizmo": {"id": 3, "name": "b"}}));
    let result = gizmo.save().await;

    assert!(matches!(result, Err(ResourceError::InvalidInput { .. })));
    assert_eq!(transport.request_count(), 1);
    assert!(!gizmo.is_changed());
    assert_eq!(gizmo.get("name").unwrap().as_str(), Some("b"));
}

// ============================================================================
// Destroy and protection
// ============================================================================

#[tokio::test]
async fn test_destroy_sends_delete_and_returns_action() {
    let transport = MockTransport::new();
    let client = client(&transport);
    let mut server = client.servers().build(&server_json()).unwrap();

    transport.respond(200, json!({"action": action_json(9, "delete_server")}));
    let action = server.destroy().await.unwrap().unwrap();

    let request = transport.last_request();
    assert_eq!(request.http_method, HttpMethod::Delete);
    assert_eq!(request.path, "servers/42");
    assert_eq!(action.id(), Some(9));
    assert!(server.is_destroyed());

    server.set("name", "ghost").unwrap();
    assert!(matches!(
        server.save().await,
        Err(ResourceError::InvalidInput { .. })
    ));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_destroy_with_empty_body_returns_no_action() {
    let transport = MockTransport::new();
    let client = client(&transport);
    let mut volume = client
        .volumes()
        .build(&json!({"id": 5, "name": "data"}))
        .unwrap();

    transport.respond(204, json!({}));
    assert!(volume.destroy().await.unwrap().is_none());
    assert_eq!(transport.last_request().path, "volumes/5");
    assert!(volume.is_destroyed());
}

#[tokio::test]
async fn test_change_protection_posts_flags() {
    let transport = MockTransport::new();
    let client = client(&transport);
    let mut server = client.servers().build(&server_json()).unwrap();

    transport.respond(201, json!({"action": action_json(11, "change_protection")}));
    let action = server
        .change_protection([("delete", true), ("rebuild", false)])
        .await
        .unwrap()
        .unwrap();

    let request = transport.last_request();
    assert_eq!(request.http_method, HttpMethod::Post);
    assert_eq!(request.path, "servers/42/actions/change_protection");
    assert_eq!(request.body, Some(json!({"delete": true, "rebuild": false})));
    assert_eq!(action.command(), Some("change_protection"));
}

#[tokio::test]
async fn test_change_protection_rejects_unknown_mode_before_sending() {
    let transport = MockTransport::new();
    let client = client(&transport);
    let mut image = client.images().build(&json!({"id": 4711})).unwrap();

    let result = image.change_protection([("rebuild", true)]).await;
    match result {
        Err(ResourceError::InvalidArgument { key, allowed }) => {
            assert_eq!(key, "rebuild");
            assert_eq!(allowed, vec!["delete".to_string()]);
        }
        other => panic!("Expected InvalidArgument, got {other:?}"),
    }
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_firewall_is_not_protectable() {
    let transport = MockTransport::new();
    let client = client(&transport);
    let mut firewall = client.firewalls().build(&json!({"id": 2})).unwrap();

    assert!(matches!(
        firewall.change_protection([("delete", true)]).await,
        Err(ResourceError::CapabilityMissing {
            resource: "firewall",
            capability: Capability::Protectable
        })
    ));
    assert_eq!(transport.request_count(), 0);
}

// ============================================================================
// Metrics and nested actions
// ============================================================================

#[tokio::test]
async fn test_metrics_request_shape() {
    let transport = MockTransport::new();
    let client = client(&transport);
    let server = client.servers().build(&server_json()).unwrap();

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
    let params = MetricsParams::new()
        .metric_type("cpu")
        .start(start)
        .end(end)
        .step(60);

    transport.respond(
        200,
        json!({"metrics": {
            "start": "2024-01-01T00:00:00+00:00",
            "end": "2024-01-01T01:00:00+00:00",
            "step": 60,
            "time_series": {"cpu": {"values": [[1_704_067_200, "42.0"]]}}
        }}),
    );
    let metrics = server.metrics(&params).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.http_method, HttpMethod::Get);
    assert_eq!(request.path, "servers/42/metrics");
    assert_eq!(request.query_value("type"), Some("cpu"));
    assert_eq!(request.query_value("start"), Some("2024-01-01T00:00:00Z"));
    assert_eq!(request.query_value("end"), Some("2024-01-01T01:00:00Z"));
    assert_eq!(request.query_value("step"), Some("60"));
    assert_eq!(metrics["step"], 60);
    assert!(metrics["time_series"]["cpu"].is_object());
}

#[tokio::test]
async fn test_invalid_metrics_params_fail_before_sending() {
    let transport = MockTransport::new();
    let client = client(&transport);
    let server = client.servers().build(&server_json()).unwrap();

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let params = MetricsParams::new().metric_type("cpu").start(start).end(start);

    match server.metrics(&params).await {
        Err(ResourceError::InvalidInput { reason }) => {
            assert_eq!(reason, "start must be before end");
        }
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_nested_actions_are_listed_and_reloaded() {
    let transport = MockTransport::new();
    let client = client(&transport);
    let server = client.servers().build(&server_json()).unwrap();

    transport.respond(
        200,
        json!({
            "actions": [action_json(13, "start_server"), action_json(14, "reboot_server")],
            "meta": {"pagination": {"page": 1, "per_page": 25, "previous_page": null,
                                    "next_page": null, "last_page": 1, "total_entries": 2}}
        }),
    );
    let actions = server.actions().unwrap().list().await.unwrap();

    assert_eq!(transport.last_request().path, "servers/42/actions");
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[1].command(), Some("reboot_server"));
    assert_eq!(actions.pagination().unwrap().total_entries, Some(2));

    let mut action = actions.into_inner().remove(0);
    let mut finished = action_json(13, "start_server");
    finished["status"] = json!("success");
    finished["progress"] = json!(100);
    transport.respond(200, json!({"action": finished}));

    action.reload().await.unwrap();
    assert_eq!(transport.last_request().path, "actions/13");
    assert_eq!(action.status(), ActionStatus::Success);
    assert_eq!(action.progress(), Some(100));
}

#[tokio::test]
async fn test_entry_without_client_cannot_save() {
    let mut server = Entry::from_raw(
        hcloud_entries::rest::resources::server::descriptor(),
        None,
        &server_json(),
    )
    .unwrap();
    server.set("name", "web-2").unwrap();

    assert!(matches!(
        server.save().await,
        Err(ResourceError::MissingClient { resource: "server" })
    ));
}
