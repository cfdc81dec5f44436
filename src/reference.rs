//! References to registry slots.
//!
//! A [`Reference`] is a cheaply-cloneable handle to the single slot a
//! registry owns for a key. Every clone aliases the same slot, so a holder
//! that obtained a handle before a value existed observes the value as soon
//! as it is registered.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::registry_error::RegistryError;

/// How a reference's slot was created.
///
/// This is a provenance marker, not a value-presence indicator: a lazy
/// reference that has since been bound still reports [`ReferenceKind::Lazy`].
/// Use [`Reference::bound`] to ask whether a value is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// The slot was created together with its value.
    Immediate,
    /// The slot was created empty, to be filled by a later registration.
    Lazy,
}

/// A handle to a registry slot that may or may not yet hold a value.
///
/// Obtained from [`Registry::get_or_create`](crate::Registry::get_or_create)
/// or [`Registry::register`](crate::Registry::register). Cloning a reference
/// is cheap and produces a handle to the same slot; [`Reference::ptr_eq`]
/// tells two handles to the same slot apart from handles to different slots.
///
/// Values are handed out as `Arc<V>` so that a bound value can be shared
/// with every holder without cloning `V` itself.
pub struct Reference<K, V> {
    inner: Arc<Slot<K, V>>,
}

struct Slot<K, V> {
    key: K,
    cell: Cell<V>,
}

enum Cell<V> {
    Immediate(Arc<V>),
    Lazy(OnceLock<Arc<V>>),
}

impl<K, V> Reference<K, V> {
    pub(crate) fn immediate(key: K, value: Arc<V>) -> Self {
        Self {
            inner: Arc::new(Slot {
                key,
                cell: Cell::Immediate(value),
            }),
        }
    }

    pub(crate) fn lazy(key: K) -> Self {
        Self {
            inner: Arc::new(Slot {
                key,
                cell: Cell::Lazy(OnceLock::new()),
            }),
        }
    }

    /// The key this reference was created for.
    pub fn key(&self) -> &K {
        &self.inner.key
    }

    /// Whether a value is currently available.
    pub fn bound(&self) -> bool {
        match &self.inner.cell {
            // An immediate reference always has a value associated with it.
            Cell::Immediate(_) => true,
            Cell::Lazy(cell) => cell.get().is_some(),
        }
    }

    /// The bound value, or `None` if the slot has not been filled yet.
    pub fn get(&self) -> Option<Arc<V>> {
        match &self.inner.cell {
            Cell::Immediate(value) => Some(Arc::clone(value)),
            Cell::Lazy(cell) => cell.get().map(Arc::clone),
        }
    }

    /// The bound value, for callers that require it to already exist.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if the slot has not been filled yet.
    pub fn need(&self) -> Result<Arc<V>, RegistryError<K, V>>
    where
        K: Clone,
    {
        self.get().ok_or_else(|| RegistryError::NotFound {
            key: self.inner.key.clone(),
        })
    }

    /// Which variant produced this reference.
    pub fn kind(&self) -> ReferenceKind {
        match self.inner.cell {
            Cell::Immediate(_) => ReferenceKind::Immediate,
            Cell::Lazy(_) => ReferenceKind::Lazy,
        }
    }

    /// Whether two handles alias the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Attempts to fill the slot with `value`.
    ///
    /// Returns `None` when the slot was empty and has now been filled.
    /// Returns the value the slot already holds otherwise, leaving the slot
    /// untouched; the caller must then decide whether the two values
    /// conflict. At most one call per lazy reference can succeed.
    pub(crate) fn bind(&self, value: Arc<V>) -> Option<Arc<V>> {
        match &self.inner.cell {
            Cell::Immediate(existing) => Some(Arc::clone(existing)),
            Cell::Lazy(cell) => match cell.set(value) {
                Ok(()) => None,
                Err(_) => cell.get().map(Arc::clone),
            },
        }
    }
}

impl<K, V> Clone for Reference<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Reference<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind() {
            ReferenceKind::Immediate => "Immediate",
            ReferenceKind::Lazy => "Lazy",
        };
        f.debug_struct(name)
            .field("key", &self.inner.key)
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_always_bound() {
        let reference: Reference<&str, u32> = Reference::immediate("answer", Arc::new(42));
        assert!(reference.bound());
        assert_eq!(reference.kind(), ReferenceKind::Immediate);
        assert_eq!(*reference.get().unwrap(), 42);
        assert_eq!(*reference.need().unwrap(), 42);
    }

    #[test]
    fn test_lazy_starts_unbound() {
        let reference: Reference<&str, u32> = Reference::lazy("pending");
        assert!(!reference.bound());
        assert_eq!(reference.kind(), ReferenceKind::Lazy);
        assert!(reference.get().is_none());
        assert_eq!(
            reference.need(),
            Err(RegistryError::NotFound { key: "pending" })
        );
    }

    #[test]
    fn test_bind_fills_slot_exactly_once() {
        let reference: Reference<&str, u32> = Reference::lazy("pending");
        let first = Arc::new(1);
        let second = Arc::new(2);

        // First bind succeeds and reports nothing.
        assert!(reference.bind(Arc::clone(&first)).is_none());
        assert!(reference.bound());
        assert!(Arc::ptr_eq(&reference.get().unwrap(), &first));

        // Every later attempt hands back the first value, untouched.
        let existing = reference.bind(second).unwrap();
        assert!(Arc::ptr_eq(&existing, &first));
        assert!(Arc::ptr_eq(&reference.get().unwrap(), &first));
    }

    #[test]
    fn test_bind_on_immediate_returns_existing() {
        let value = Arc::new(7);
        let reference: Reference<&str, u32> = Reference::immediate("fixed", Arc::clone(&value));
        let existing = reference.bind(Arc::new(8)).unwrap();
        assert!(Arc::ptr_eq(&existing, &value));
    }

    #[test]
    fn test_kind_is_provenance_not_fill_state() {
        let reference: Reference<&str, u32> = Reference::lazy("pending");
        reference.bind(Arc::new(3));
        // The slot behaves like an immediate reference once filled, but the
        // kind still reports how it was created.
        assert!(reference.bound());
        assert_eq!(reference.kind(), ReferenceKind::Lazy);
    }

    #[test]
    fn test_clones_alias_the_same_slot() {
        let reference: Reference<&str, u32> = Reference::lazy("shared");
        let holder = reference.clone();
        assert!(reference.ptr_eq(&holder));

        reference.bind(Arc::new(11));
        assert!(holder.bound());
        assert_eq!(*holder.need().unwrap(), 11);

        let other: Reference<&str, u32> = Reference::lazy("shared");
        assert!(!reference.ptr_eq(&other));
    }

    #[test]
    fn test_debug_shows_kind_key_and_value() {
        let unbound: Reference<&str, u32> = Reference::lazy("a");
        assert_eq!(format!("{:?}", unbound), "Lazy { key: \"a\", value: None }");

        let bound: Reference<&str, u32> = Reference::immediate("b", Arc::new(5));
        assert_eq!(
            format!("{:?}", bound),
            "Immediate { key: \"b\", value: Some(5) }"
        );
    }
}
