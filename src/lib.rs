//! # hcloud-entries
//!
//! Typed, change-tracked resource entries for the Hetzner Cloud REST API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Validated configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - An async HTTP transport with bearer authentication, retries and
//!   rate-limit parsing ([`clients`])
//! - A declarative resource framework ([`rest`]): kinds are described once by
//!   a [`ResourceDescriptor`] and every API object is an [`Entry`] with
//!   change tracking, update hooks and capability-gated operations
//! - Automatic materialization of asynchronous [`Action`](rest::Action)s
//!   returned by mutating calls
//!
//! ## Quick Start
//!
//! ```rust
//! use hcloud_entries::{ApiToken, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .token(ApiToken::new("my-token").unwrap())
//!     .tries(3)
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Working With Entries
//!
//! ```rust,ignore
//! use hcloud_entries::{Client, ClientConfig, ApiToken};
//! use hcloud_entries::rest::ListParams;
//!
//! let client = Client::new(&config);
//!
//! let servers = client
//!     .servers()
//!     .all(&ListParams { label_selector: Some("env=prod".into()), ..Default::default() })
//!     .await?;
//!
//! for mut server in servers {
//!     server.set("labels", serde_json::json!({"env": "prod", "patched": "yes"}))?;
//!     server.save().await?;
//! }
//! ```
//!
//! ## Custom Transports
//!
//! [`Client::with_transport`] accepts any [`clients::Transport`], which is
//! how tests run the framework without a network.
//!
//! ## Design Principles
//!
//! - **Fail-fast validation**: newtypes and capability checks reject bad
//!   input before a request is sent
//! - **Thread-safe**: clients, descriptors and entries are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{ApiToken, BaseUrl, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError, Pagination,
    RateLimit,
};

pub use rest::{Client, Entry, ResourceDescriptor, ResourceError};
