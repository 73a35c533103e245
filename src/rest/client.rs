//! The client handle shared by entries.
//!
//! [`Client`] is a cheap, cloneable handle around a [`Transport`]. Every
//! entry loaded through it keeps a clone, so operations on nested entries
//! and actions reach the same transport.

use std::sync::Arc;

use crate::clients::{HttpClient, Transport};
use crate::config::ClientConfig;
use crate::rest::action::ActionResource;
use crate::rest::descriptor::ResourceDescriptor;
use crate::rest::dispatch::{ApiResponse, Outcome, RequestDescriptor};
use crate::rest::errors::ResourceError;
use crate::rest::registry::Registry;
use crate::rest::resource::Resource;
use crate::rest::resources;

/// Handle used to dispatch requests.
///
/// # Example
///
/// ```rust,ignore
/// use hcloud_entries::{ApiToken, Client, ClientConfig};
///
/// let config = ClientConfig::builder()
///     .token(ApiToken::new(std::env::var("HCLOUD_TOKEN")?)?)
///     .build()?;
/// let client = Client::new(&config);
///
/// for server in client.servers().list().await?.iter() {
///     println!("{:?}", server.attribute("name"));
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl Client {
    /// Creates a client backed by [`HttpClient`].
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(Arc::new(HttpClient::new(config)))
    }

    /// Creates a client backed by any transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Sends a request and wraps the response.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] for 404,
    /// [`ResourceError::ValidationFailed`] for rejected input and
    /// [`ResourceError::Http`] for every other transport failure.
    pub async fn dispatch(&self, request: RequestDescriptor) -> Result<ApiResponse, ResourceError> {
        let resource = request.resource();
        let autoload = request.autoloads_action();
        let subject = request.subject_or_path().to_string();

        tracing::debug!(
            resource = resource.name(),
            method = request.method().as_str(),
            path = request.path(),
            autoload,
            "dispatching request"
        );

        let http_request = request.into_http_request()?;
        let response = self
            .transport
            .send(http_request)
            .await
            .map_err(|e| ResourceError::from_http_error(e, resource.name(), &subject))?;

        Ok(ApiResponse::new(response, self.clone(), resource, autoload))
    }

    /// Sends a request and routes the response through the loader and the
    /// action autoloader.
    ///
    /// # Errors
    ///
    /// See [`Client::dispatch`] and [`Outcome::from_response`].
    pub async fn prepare_request(&self, request: RequestDescriptor) -> Result<Outcome, ResourceError> {
        let response = self.dispatch(request).await?;
        Outcome::from_response(&response)
    }

    /// Sends a request and applies `transform` to the response instead of
    /// the default routing.
    ///
    /// # Errors
    ///
    /// See [`Client::dispatch`]; errors returned by `transform` are passed
    /// through.
    pub async fn prepare_request_with<T, F>(&self, request: RequestDescriptor, transform: F) -> Result<T, ResourceError>
    where
        F: FnOnce(ApiResponse) -> Result<T, ResourceError>,
    {
        let response = self.dispatch(request).await?;
        transform(response)
    }

    /// Returns the class-level handle of a resource kind.
    #[must_use]
    pub fn resource(&self, descriptor: &'static ResourceDescriptor) -> Resource {
        Resource::new(self.clone(), descriptor)
    }

    /// Looks up a registered resource kind by singular or collection name.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] listing the registered
    /// names if `name` is unknown.
    pub fn resource_named(&self, name: &str) -> Result<Resource, ResourceError> {
        let registry = Registry::global();
        registry
            .get(name)
            .or_else(|| registry.by_collection(name))
            .map(|descriptor| self.resource(descriptor))
            .ok_or_else(|| ResourceError::InvalidArgument {
                key: name.to_string(),
                allowed: registry.names().map(String::from).collect(),
            })
    }

    /// Returns all actions of the project (`/actions`).
    #[must_use]
    pub fn actions(&self) -> ActionResource {
        ActionResource::new(self.clone(), crate::rest::action::descriptor().collection())
    }

    /// Returns the `servers` resource.
    #[must_use]
    pub fn servers(&self) -> Resource {
        self.resource(resources::server::descriptor())
    }

    /// Returns the `images` resource.
    #[must_use]
    pub fn images(&self) -> Resource {
        self.resource(resources::image::descriptor())
    }

    /// Returns the `volumes` resource.
    #[must_use]
    pub fn volumes(&self) -> Resource {
        self.resource(resources::volume::descriptor())
    }

    /// Returns the `firewalls` resource.
    #[must_use]
    pub fn firewalls(&self) -> Resource {
        self.resource(resources::firewall::descriptor())
    }

    /// Returns the `datacenters` resource.
    #[must_use]
    pub fn datacenters(&self) -> Resource {
        self.resource(resources::datacenter::descriptor())
    }

    /// Returns the `locations` resource.
    #[must_use]
    pub fn locations(&self) -> Resource {
        self.resource(resources::location::descriptor())
    }
}
