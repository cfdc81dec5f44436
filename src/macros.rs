//! Macro for declaring process-global binding registries.
//!
//! The library's [`Registry`](crate::Registry) is an owned value mutated
//! through `&mut self`. Staged initialization often wants a registry that
//! producers and consumers in different modules can reach without threading
//! a reference around; this module provides that as a mutex-guarded global.

/// Declares a module wrapping a process-global [`Registry`](crate::Registry).
///
/// The generated module owns a `LazyLock<Mutex<Registry>>` and exposes free
/// functions that lock it per call: `get_or_create`, `register`,
/// `register_arc`, `get`, `contains`, `keys`, `len`, and `is_empty`. The
/// mutex serializes map access, and a lazy slot fills at most once, so the
/// binding invariants hold even when producers race from multiple threads.
///
/// # Examples
///
/// ```rust
/// use binding_registry::define_registry;
///
/// define_registry!(services, String, u32);
///
/// // A consumer can take a handle before the producer has run...
/// let handle = services::get_or_create("http.port".to_string());
/// assert!(!handle.bound());
///
/// // ...and observes the value once registration happens.
/// services::register("http.port".to_string(), 8080).unwrap();
/// assert!(handle.bound());
/// assert_eq!(*handle.need().unwrap(), 8080);
/// ```
///
/// # Multiple Registries
///
/// Each invocation produces a fully isolated registry:
///
/// ```rust
/// use binding_registry::define_registry;
///
/// define_registry!(commands, String, u8);
/// define_registry!(codecs, String, u8);
///
/// commands::register("quit".to_string(), 1).unwrap();
///
/// assert!(commands::contains(&"quit".to_string()));
/// assert!(!codecs::contains(&"quit".to_string()));
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident, $key:ty, $value:ty) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock, Mutex};

            static REGISTRY: LazyLock<Mutex<$crate::Registry<$key, $value>>> =
                LazyLock::new(|| Mutex::new($crate::Registry::new()));

            fn with<R>(f: impl FnOnce(&mut $crate::Registry<$key, $value>) -> R) -> R {
                // Poisoning only occurs if a thread panicked while holding the
                // lock; every registry operation leaves the map consistent, so
                // recovering the lock is sound.
                let mut guard = REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                f(&mut guard)
            }

            /// Returns the reference for `key`, creating an unbound lazy
            /// reference if none exists yet.
            pub fn get_or_create(key: $key) -> $crate::Reference<$key, $value> {
                with(|registry| registry.get_or_create(key))
            }

            /// Registers `value` under `key`.
            pub fn register(
                key: $key,
                value: $value,
            ) -> Result<$crate::Reference<$key, $value>, $crate::RegistryError<$key, $value>> {
                with(|registry| registry.register(key, value))
            }

            /// Registers an `Arc`-wrapped value under `key`.
            pub fn register_arc(
                key: $key,
                value: Arc<$value>,
            ) -> Result<$crate::Reference<$key, $value>, $crate::RegistryError<$key, $value>> {
                with(|registry| registry.register_arc(key, value))
            }

            /// The existing reference for `key`, without creating one.
            pub fn get(key: &$key) -> Option<$crate::Reference<$key, $value>> {
                with(|registry| registry.get(key))
            }

            /// Whether a reference exists for `key`, bound or not.
            pub fn contains(key: &$key) -> bool {
                with(|registry| registry.contains_key(key))
            }

            /// A snapshot of all tracked keys.
            pub fn keys() -> Vec<$key> {
                with(|registry| registry.keys().cloned().collect())
            }

            /// Number of tracked keys.
            pub fn len() -> usize {
                with(|registry| registry.len())
            }

            /// Whether no keys are tracked yet.
            pub fn is_empty() -> bool {
                with(|registry| registry.is_empty())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    #[test]
    fn test_define_registry_macro() {
        define_registry!(test_reg, String, u32);

        let handle = test_reg::get_or_create("a".to_string());
        assert!(!handle.bound());
        assert!(test_reg::contains(&"a".to_string()));

        test_reg::register("a".to_string(), 100).unwrap();
        assert!(handle.bound());
        assert_eq!(*handle.need().unwrap(), 100);
    }

    #[test]
    fn test_multiple_registries() {
        define_registry!(reg_a, String, u32);
        define_registry!(reg_b, String, u32);

        reg_a::register("shared-key".to_string(), 1).unwrap();
        reg_b::register("shared-key".to_string(), 2).unwrap();

        // Same key, no interference between registries.
        assert_eq!(*reg_a::get(&"shared-key".to_string()).unwrap().need().unwrap(), 1);
        assert_eq!(*reg_b::get(&"shared-key".to_string()).unwrap().need().unwrap(), 2);
    }

    #[test]
    fn test_register_arc_keeps_identity() {
        define_registry!(identity_reg, String, u32);

        let value = Arc::new(9);
        let first = identity_reg::register_arc("k".to_string(), Arc::clone(&value)).unwrap();
        // Re-registering the same allocation is an allowed no-op.
        let second = identity_reg::register_arc("k".to_string(), value).unwrap();
        assert!(first.ptr_eq(&second));

        // A fresh allocation of the same number conflicts.
        assert!(identity_reg::register_arc("k".to_string(), Arc::new(9)).is_err());
    }

    #[test]
    fn test_keys_snapshot() {
        define_registry!(snapshot_reg, String, u32);

        assert!(snapshot_reg::is_empty());
        snapshot_reg::get_or_create("pending".to_string());
        snapshot_reg::register("ready".to_string(), 1).unwrap();

        let mut keys = snapshot_reg::keys();
        keys.sort_unstable();
        assert_eq!(keys, vec!["pending".to_string(), "ready".to_string()]);
        assert_eq!(snapshot_reg::len(), 2);
    }
}
