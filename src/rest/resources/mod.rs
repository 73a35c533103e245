//! Built-in resource kinds.
//!
//! Each submodule declares one kind through a [`ResourceDescriptor`] and
//! exposes it as `descriptor()`. The declarations are thin: everything an
//! entry can do comes from the generic [`Entry`](crate::rest::Entry) and the
//! capability flags set here.
//!
//! | kind         | updatable                    | capabilities                                   |
//! |--------------|------------------------------|------------------------------------------------|
//! | `server`     | name, labels                 | destructible, protectable, actions, metrics    |
//! | `image`      | description, type, labels    | destructible, protectable, actions             |
//! | `volume`     | name, labels                 | destructible, protectable, actions             |
//! | `firewall`   | name, labels                 | destructible, actions                          |
//! | `datacenter` |                              |                                                |
//! | `location`   |                              |                                                |
//!
//! The `action` kind lives in [`crate::rest::action`].

use crate::rest::ResourceDescriptor;

pub mod datacenter;
pub mod firewall;
pub mod image;
pub mod location;
pub mod server;
pub mod volume;

/// Returns every built-in kind, including `action`.
#[must_use]
pub fn builtin() -> [&'static ResourceDescriptor; 7] {
    [
        crate::rest::action::descriptor(),
        datacenter::descriptor(),
        firewall::descriptor(),
        image::descriptor(),
        location::descriptor(),
        server::descriptor(),
        volume::descriptor(),
    ]
}
