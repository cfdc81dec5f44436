//! The keyed map that creates, looks up, and binds references.

use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::reference::Reference;
use crate::registry_error::RegistryError;

/// A registry mapping keys to [`Reference`] slots.
///
/// Exactly one slot exists per key for the lifetime of the registry. A key
/// enters the map either through [`Registry::get_or_create`] (an unbound
/// lazy reference, to be filled by a later registration) or through
/// [`Registry::register`] (a bound immediate reference). Keys are never
/// removed and a slot is never replaced; later registrations fill the
/// existing slot in place, so every holder of a handle observes the value.
///
/// All mutation goes through `&mut self`, which makes a registry safe to
/// own from a single place and hand out `Reference` handles freely; the
/// handles are `Send + Sync` whenever `K` and `V` are. For a shared
/// process-global registry, see [`define_registry!`](crate::define_registry).
#[derive(Debug)]
pub struct Registry<K, V> {
    by_key: HashMap<K, Reference<K, V>>,
}

impl<K, V> Registry<K, V> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            by_key: HashMap::new(),
        }
    }

    /// All keys currently tracked, bound and unbound. Order is not
    /// significant.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.by_key.keys()
    }

    /// Iterates over all tracked keys and their references.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Reference<K, V>)> {
        self.by_key.iter()
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether no keys are tracked yet.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl<K, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> Registry<K, V> {
    /// The existing reference for `key`, without creating one.
    pub fn get<Q>(&self, key: &Q) -> Option<Reference<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.by_key.get(key).cloned()
    }

    /// Whether a reference exists for `key`, bound or not.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.by_key.contains_key(key)
    }
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Returns the reference for `key`, creating an unbound lazy reference
    /// if none exists yet.
    ///
    /// The returned handle observes a value registered for `key` later on,
    /// which lets a consumer be wired up before the producer of the value
    /// has run.
    pub fn get_or_create(&mut self, key: K) -> Reference<K, V> {
        match self.by_key.entry(key) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                // No value has been registered for the given key yet - a lazy
                // reference provides a way to access the value once it has
                // been registered later on.
                trace!(key = ?entry.key(), "created lazy reference");
                let reference = Reference::lazy(entry.key().clone());
                entry.insert(reference).clone()
            }
        }
    }

    /// Registers `value` under `key`, returning the key's reference.
    ///
    /// The value is wrapped in a fresh `Arc`, so a repeated call with an
    /// equal-looking value is a *different* value as far as conflict
    /// detection is concerned and fails with `AlreadyBound`. Callers that
    /// need idempotent re-registration should hold on to the `Arc` and use
    /// [`Registry::register_arc`].
    ///
    /// # Errors
    ///
    /// [`RegistryError::AlreadyBound`] if `key` is already bound to a
    /// different value. The existing binding stands.
    pub fn register(&mut self, key: K, value: V) -> Result<Reference<K, V>, RegistryError<K, V>> {
        self.register_arc(key, Arc::new(value))
    }

    /// Registers an `Arc`-wrapped value under `key`, returning the key's
    /// reference.
    ///
    /// If no reference exists for `key`, a bound immediate reference is
    /// created. If an unbound lazy reference exists, its slot is filled in
    /// place and every holder of that handle sees the value. Re-registering
    /// the *same* `Arc` (pointer-identical) is a no-op and succeeds.
    ///
    /// # Errors
    ///
    /// [`RegistryError::AlreadyBound`] if `key` is already bound to a
    /// different value, carrying the key, the existing value, and the
    /// rejected value. The registry is left unchanged.
    pub fn register_arc(
        &mut self,
        key: K,
        value: Arc<V>,
    ) -> Result<Reference<K, V>, RegistryError<K, V>> {
        match self.by_key.entry(key) {
            Entry::Vacant(entry) => {
                // No reference was requested prior to registration.
                trace!(key = ?entry.key(), "registered immediate reference");
                let reference = Reference::immediate(entry.key().clone(), value);
                Ok(entry.insert(reference).clone())
            }
            Entry::Occupied(entry) => {
                let reference = entry.get();

                // A reference exists for this key - attempt to bind the value
                // to it. `bind` hands back the currently bound value when the
                // slot is already filled, in which case the conflict check
                // decides whether this registration is an allowed repeat.
                match reference.bind(Arc::clone(&value)) {
                    None => {
                        trace!(key = ?reference.key(), "bound value to lazy reference");
                    }
                    Some(existing) => {
                        if let Some(error) = already_bound(reference.key(), existing, value) {
                            debug!(key = ?reference.key(), "rejected conflicting registration");
                            return Err(error);
                        }
                    }
                }

                Ok(reference.clone())
            }
        }
    }
}

/// The conflict rule: binding the same value again is allowed, binding a
/// different value is not. Identity is `Arc::ptr_eq`; two equal-looking
/// values in separate allocations still conflict.
fn already_bound<K: Clone, V>(
    key: &K,
    existing: Arc<V>,
    rejected: Arc<V>,
) -> Option<RegistryError<K, V>> {
    if Arc::ptr_eq(&existing, &rejected) {
        None
    } else {
        Some(RegistryError::AlreadyBound {
            key: key.clone(),
            existing,
            rejected,
        })
    }
}
