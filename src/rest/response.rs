//! Response-tagged sequences of entries.
//!
//! [`Collection<T>`] is the ordered result of a list request, tagged with
//! the metadata of the response it came from: pagination, rate limit and
//! request id. It implements `Deref<Target = Vec<T>>`, so it can be used
//! like the vector directly:
//!
//! ```rust,ignore
//! let servers = client.servers().all(&ListParams::default()).await?;
//!
//! for server in servers.iter() {
//!     println!("{:?}", server.attribute("name"));
//! }
//!
//! if servers.has_next_page() {
//!     let params = ListParams { page: servers.next_page(), ..Default::default() };
//!     let more = client.servers().all(&params).await?;
//! }
//! ```

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use serde_json::Value;

use crate::clients::{HttpResponse, Pagination, RateLimit};
use crate::rest::dispatch::ApiResponse;
use crate::rest::entry::Entry;
use crate::rest::errors::ResourceError;

/// An ordered sequence tagged with response metadata.
///
/// # Example
///
/// ```rust
/// use hcloud_entries::rest::Collection;
///
/// let collection = Collection::new(vec!["a", "b", "c"], None);
/// assert_eq!(collection.len(), 3);
/// assert_eq!(collection[0], "a");
/// assert!(!collection.has_next_page());
/// ```
#[derive(Debug, Clone)]
pub struct Collection<T = Entry> {
    items: Vec<T>,
    response: Option<Arc<HttpResponse>>,
    pagination: Option<Pagination>,
}

impl<T> Collection<T> {
    /// Tags `items` with the metadata of `response`.
    #[must_use]
    pub fn new(items: Vec<T>, response: Option<Arc<HttpResponse>>) -> Self {
        let pagination = response.as_ref().and_then(|r| r.pagination());
        Self {
            items,
            response,
            pagination,
        }
    }

    /// Consumes the collection and returns the items.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.items
    }

    /// Returns the originating response, if any.
    #[must_use]
    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_deref()
    }

    /// Returns the `meta.pagination` block of the response.
    #[must_use]
    pub const fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Returns `true` if the API reported a next page.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.next_page().is_some()
    }

    /// Returns `true` if the API reported a previous page.
    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.pagination.as_ref().and_then(|p| p.previous_page).is_some()
    }

    /// Returns the next page number, if any.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        self.pagination.as_ref().and_then(|p| p.next_page)
    }

    /// Returns the rate limit reported with the response.
    #[must_use]
    pub fn rate_limit(&self) -> Option<RateLimit> {
        self.response.as_ref().and_then(|r| r.rate_limit)
    }

    /// Returns the `X-Request-Id` of the response.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.response.as_ref().and_then(|r| r.request_id())
    }

    /// Converts every item, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> Collection<U>
    where
        F: FnMut(T) -> U,
    {
        Collection {
            items: self.items.into_iter().map(f).collect(),
            response: self.response,
            pagination: self.pagination,
        }
    }
}

impl Collection<Entry> {
    /// Loads every element of the response's primary attribute list.
    ///
    /// A missing or `null` list yields an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedResponse`] if the primary
    /// attributes are not a list, or the loader's error for a malformed
    /// element.
    pub fn from_response(response: &ApiResponse) -> Result<Self, ResourceError> {
        let items = match response.resource_attributes() {
            None => Vec::new(),
            Some(Value::Array(raw)) => raw
                .iter()
                .map(|item| response.load_entry(item))
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(ResourceError::UnexpectedResponse {
                    resource: response.resource().name(),
                    message: format!("expected a list under `{}`", response.resource().collection()),
                })
            }
        };

        Ok(Self::new(items, Some(Arc::clone(response.http()))))
    }
}

impl<T> Deref for Collection<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> DerefMut for Collection<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.items
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
