//! The entry framework.
//!
//! This module turns JSON objects of the Hetzner Cloud API into typed,
//! change-tracked [`Entry`] values and maps entry operations to REST calls:
//!
//! - **[`ResourceDescriptor`]**: declares a resource kind (schema, updatable
//!   fields, capabilities, hooks)
//! - **[`ResourceLoader`]**: coerces raw JSON into [`AttributeValue`]s,
//!   instantiating nested entries
//! - **[`AttributeStore`]**: tracks assignments against the last loaded
//!   snapshot
//! - **[`RequestDescriptor`]** and [`Client::prepare_request`]: dispatch plus
//!   response routing into an [`Outcome`]
//! - **[`Entry`]**: generic find/update/destroy/protection/metrics logic
//! - **[`Resource`]**: class-level listing, lookup and creation
//! - **[`Action`]**: server-side operations, autoloaded from responses
//! - **[`Registry`]**: lookup of resource kinds by name
//! - **[`ResourceError`]**: semantic errors for everything above
//!
//! # Example
//!
//! ```rust,ignore
//! use hcloud_entries::{ApiToken, Client, ClientConfig};
//!
//! let client = Client::new(&ClientConfig::builder().token(ApiToken::new(token)?).build()?);
//!
//! let mut server = client.servers().find(42).await?;
//! server.set("name", "web-2")?;
//! for action in server.save().await? {
//!     println!("{} is {}", action.command().unwrap_or("?"), action.status());
//! }
//!
//! if let Some(action) = server.destroy().await? {
//!     println!("deleting: {:?}", action.id());
//! }
//! ```
//!
//! # Key Types
//!
//! - [`Schema`] and [`FieldType`]: declared fields
//! - [`Collection`]: list results with pagination metadata
//! - [`ResourceOperation`]: operation names used in paths and errors
//! - [`MetricsParams`]: validated metrics query
//! - [`resources`]: the built-in kinds

mod client;
mod descriptor;
mod dispatch;
mod entry;
mod errors;
mod loader;
mod metrics;
mod path;
mod registry;
mod resource;
mod response;
mod schema;
mod tracking;

pub mod action;
pub mod resources;

pub use action::{Action, ActionResource, ActionStatus};
pub use client::Client;
pub use descriptor::{Hook, ResourceDescriptor, ResourceDescriptorBuilder, ResourceUrlFn};
pub use dispatch::{Actions, ApiResponse, Outcome, RequestDescriptor};
pub use entry::Entry;
pub use errors::{Capability, ResourceError};
pub use loader::{AttributeMap, AttributeValue, ResourceLoader};
pub use metrics::MetricsParams;
pub use path::{instance_path, join_path, ResourceOperation};
pub use registry::Registry;
pub use resource::{Created, ListParams, Resource};
pub use response::Collection;
pub use schema::{DescriptorRef, FieldType, Schema};
pub use tracking::AttributeStore;
