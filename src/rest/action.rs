//! Asynchronous server-side operations.
//!
//! Most mutating API calls answer with an `action` (or an `actions` list)
//! describing work the platform carries out in the background. [`Action`] is
//! an [`Entry`] of the built-in `action` kind with typed accessors for its
//! well-known fields. Actions are produced by the autoloader or fetched
//! through an [`ActionResource`], either globally (`/actions`) or scoped to
//! one entry (`/servers/42/actions`).

use std::fmt;
use std::ops::Deref;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::clients::HttpMethod;
use crate::rest::descriptor::ResourceDescriptor;
use crate::rest::dispatch::RequestDescriptor;
use crate::rest::entry::Entry;
use crate::rest::errors::ResourceError;
use crate::rest::loader::AttributeValue;
use crate::rest::path::join_path;
use crate::rest::resource::{serialize_to_query, ListParams};
use crate::rest::response::Collection;
use crate::rest::schema::FieldType;
use crate::rest::Client;

/// The built-in `action` kind.
pub fn descriptor() -> &'static ResourceDescriptor {
    static DESCRIPTOR: OnceLock<ResourceDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        ResourceDescriptor::builder("action", "actions")
            .schema([
                ("id", FieldType::Integer),
                ("command", FieldType::String),
                ("status", FieldType::String),
                ("progress", FieldType::Integer),
                ("started", FieldType::Time),
                ("finished", FieldType::Time),
                ("resources", FieldType::List(&FieldType::Object)),
                ("error", FieldType::Object),
            ])
            .build()
    })
}

/// Status of an [`Action`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionStatus {
    /// Still in progress.
    Running,
    /// Finished successfully.
    Success,
    /// Finished with an error.
    Error,
    /// Missing or not recognized.
    Unknown,
}

impl ActionStatus {
    fn parse(status: Option<&str>) -> Self {
        match status {
            Some("running") => Self::Running,
            Some("success") => Self::Success,
            Some("error") => Self::Error,
            _ => Self::Unknown,
        }
    }

    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Success => "success",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry of the `action` kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Action(Entry);

impl Action {
    /// Loads an action from its raw attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidAttribute`] on schema mismatches.
    pub fn from_raw(client: Option<Client>, raw: &Value) -> Result<Self, ResourceError> {
        Entry::from_raw(descriptor(), client, raw).map(Self)
    }

    /// Wraps an entry of the `action` kind.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedResponse`] if the entry is of a
    /// different kind.
    pub fn from_entry(entry: Entry) -> Result<Self, ResourceError> {
        if std::ptr::eq(entry.descriptor(), descriptor()) {
            Ok(Self(entry))
        } else {
            Err(ResourceError::UnexpectedResponse {
                resource: entry.descriptor().name(),
                message: "not an action".to_string(),
            })
        }
    }

    /// Returns the action id.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.0.attribute("id").and_then(AttributeValue::as_i64)
    }

    /// Returns the command, e.g. `start_server`.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        self.0.attribute("command").and_then(AttributeValue::as_str)
    }

    /// Returns the status.
    #[must_use]
    pub fn status(&self) -> ActionStatus {
        ActionStatus::parse(self.0.attribute("status").and_then(AttributeValue::as_str))
    }

    /// Returns the progress in percent.
    #[must_use]
    pub fn progress(&self) -> Option<i64> {
        self.0.attribute("progress").and_then(AttributeValue::as_i64)
    }

    /// Returns when the action started.
    #[must_use]
    pub fn started(&self) -> Option<&DateTime<Utc>> {
        self.0.attribute("started").and_then(AttributeValue::as_time)
    }

    /// Returns when the action finished.
    #[must_use]
    pub fn finished(&self) -> Option<&DateTime<Utc>> {
        self.0.attribute("finished").and_then(AttributeValue::as_time)
    }

    /// Returns the error message of a failed action.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.0
            .attribute("error")
            .and_then(AttributeValue::as_json)
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
    }

    /// Returns `true` while the action is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status() == ActionStatus::Running
    }

    /// Refetches the action from `actions/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingClient`] or
    /// [`ResourceError::MissingId`] when the action cannot be addressed,
    /// otherwise any dispatch error.
    pub async fn reload(&mut self) -> Result<(), ResourceError> {
        let client = self.0.require_client()?.clone();
        let id = self.id().ok_or(ResourceError::MissingId {
            resource: descriptor().name(),
            operation: crate::rest::path::ResourceOperation::Find,
        })?;
        *self = ActionResource::new(client, descriptor().collection()).find(id).await?;
        Ok(())
    }

    /// Returns the underlying entry.
    #[must_use]
    pub fn into_entry(self) -> Entry {
        self.0
    }
}

impl Deref for Action {
    type Target = Entry;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Actions reachable under a base path.
///
/// # Example
///
/// ```rust,ignore
/// let running = client
///     .actions()
///     .all(&ListParams { status: Some("running".into()), ..Default::default() })
///     .await?;
/// let server_actions = server.actions()?.all(&ListParams::default()).await?;
/// ```
#[derive(Clone, Debug)]
pub struct ActionResource {
    client: Client,
    base_path: String,
}

impl ActionResource {
    /// Creates an action resource rooted at `base_path`.
    #[must_use]
    pub fn new(client: Client, base_path: impl Into<String>) -> Self {
        Self {
            client,
            base_path: base_path.into(),
        }
    }

    /// Returns the base path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.base_path
    }

    /// Lists actions.
    ///
    /// # Errors
    ///
    /// Returns any dispatch error.
    pub async fn all<P: Serialize + ?Sized>(&self, params: &P) -> Result<Collection<Action>, ResourceError> {
        let request = RequestDescriptor::new(HttpMethod::Get, self.base_path.clone(), descriptor())
            .query(serialize_to_query(params)?)
            .autoload_action(false);

        let collection = self
            .client
            .prepare_request_with(request, |response| Collection::from_response(&response))
            .await?;
        Ok(collection.map(Action))
    }

    /// Lists actions with default parameters.
    ///
    /// # Errors
    ///
    /// Returns any dispatch error.
    pub async fn list(&self) -> Result<Collection<Action>, ResourceError> {
        self.all(&ListParams::default()).await
    }

    /// Fetches one action.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] for unknown ids and
    /// [`ResourceError::UnexpectedResponse`] if the body carries no action.
    pub async fn find(&self, id: i64) -> Result<Action, ResourceError> {
        let id = id.to_string();
        let request = RequestDescriptor::new(
            HttpMethod::Get,
            join_path(&self.base_path, Some(&id)),
            descriptor(),
        )
        .subject(id)
        .autoload_action(false);

        let entry = self.client.prepare_request(request).await?.into_entry();
        entry.map(Action).ok_or_else(|| ResourceError::UnexpectedResponse {
            resource: descriptor().name(),
            message: "response carries no action".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::server;
    use serde_json::json;

    #[test]
    fn test_typed_accessors() {
        let raw = json!({
            "id": 13,
            "command": "start_server",
            "status": "error",
            "progress": 100,
            "started": "2016-01-30T23:55:00+00:00",
            "finished": "2016-01-30T23:56:00+00:00",
            "resources": [{"id": 42, "type": "server"}],
            "error": {"code": "action_failed", "message": "Action failed"}
        });
        let action = Action::from_raw(None, &raw).unwrap();

        assert_eq!(action.id(), Some(13));
        assert_eq!(action.command(), Some("start_server"));
        assert_eq!(action.status(), ActionStatus::Error);
        assert_eq!(action.progress(), Some(100));
        assert!(action.started().unwrap() < action.finished().unwrap());
        assert_eq!(action.error_message(), Some("Action failed"));
        assert!(!action.is_running());
    }

    #[test]
    fn test_unknown_status() {
        let action = Action::from_raw(None, &json!({"id": 1})).unwrap();
        assert_eq!(action.status(), ActionStatus::Unknown);
        assert!(action.finished().is_none());
    }

    #[test]
    fn test_from_entry_checks_kind() {
        let entry = Entry::from_raw(server::descriptor(), None, &json!({"id": 1})).unwrap();
        assert!(Action::from_entry(entry).is_err());

        let entry = Entry::from_raw(descriptor(), None, &json!({"id": 1})).unwrap();
        assert_eq!(Action::from_entry(entry).unwrap().id(), Some(1));
    }

    #[tokio::test]
    async fn test_reload_without_client_fails() {
        let mut action = Action::from_raw(None, &json!({"id": 1})).unwrap();
        assert!(matches!(
            action.reload().await,
            Err(ResourceError::MissingClient { resource: "action" })
        ));
    }
}
