//! # Binding Registry
//!
//! A generic key-to-value binding registry with forward references: a
//! consumer may request a handle for a key before any value has been
//! registered for that key, and later observe the bound value through that
//! same handle once registration occurs.
//!
//! This decouples "declare interest in a key" from "provide the value for a
//! key", which is what staged initialization needs — plugin systems,
//! dependency graphs, and deferred configuration wire consumers and
//! producers up in different orders.
//!
//! ## Quick Start
//!
//! ```rust
//! use binding_registry::Registry;
//!
//! let mut registry = Registry::new();
//!
//! // A consumer takes a handle before the producer has run.
//! let handle = registry.get_or_create("database.url");
//! assert!(!handle.bound());
//!
//! // Once the producer registers, every holder of the handle sees the value.
//! registry.register("database.url", "postgres://localhost".to_string()).unwrap();
//! assert!(handle.bound());
//! assert_eq!(&*handle.need().unwrap(), "postgres://localhost");
//! ```
//!
//! ## Binding rules
//!
//! - Exactly one reference slot exists per key; handles are cheap clones of
//!   it, and a slot fills at most once.
//! - Re-registering the *same* value (`Arc` identity) is an allowed no-op;
//!   registering a different value for a bound key fails with
//!   [`RegistryError::AlreadyBound`] and leaves the binding untouched.
//! - [`Reference::kind`] reports how a slot was created ([`ReferenceKind`]),
//!   not whether it currently holds a value.
//!
//! ## Main types
//!
//! - [`Registry`] - the keyed map: `get_or_create`, `register`,
//!   `register_arc`, `get`, `keys`
//! - [`Reference`] - a handle to a slot: `bound`, `get`, `need`, `kind`
//! - [`RegistryError`] - `NotFound` and `AlreadyBound`
//! - [`define_registry!`] - a mutex-guarded process-global registry
//!
//! The library emits [`tracing`] events (`trace!` for reference creation and
//! binding, `debug!` for rejected registrations); install a subscriber in
//! the host to surface them.

mod macros;
mod reference;
mod registry;
mod registry_error;

pub use reference::{Reference, ReferenceKind};
pub use registry::Registry;
pub use registry_error::RegistryError;
