use std::sync::Arc;

use thiserror::Error;

/// Errors produced by [`Registry`](crate::Registry) and
/// [`Reference`](crate::Reference) operations.
///
/// Both variants carry the key they relate to. `AlreadyBound` additionally
/// carries the value that is bound and the value that was rejected, so the
/// host can report exactly which registration lost the race.
///
/// No failure is fatal to the registry itself: after an `AlreadyBound`
/// failure the registry is left exactly as it was before the call and
/// remains fully usable.
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError<K, V> {
    /// `need()` was called on a reference that is not yet bound.
    #[error("no value bound for {key}")]
    NotFound {
        /// The key of the unbound reference.
        key: K,
    },

    /// A registration supplied a value for a key that is already bound to a
    /// different value. The existing binding stands.
    #[error("{key} is already bound to {existing:?}, cannot bind to {rejected:?}")]
    AlreadyBound {
        /// The key whose binding was contested.
        key: K,
        /// The value the key is bound to.
        existing: Arc<V>,
        /// The value that was rejected.
        rejected: Arc<V>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err: RegistryError<&str, u32> = RegistryError::NotFound { key: "empty" };
        assert_eq!(err.to_string(), "no value bound for empty");
    }

    #[test]
    fn test_already_bound_display() {
        let err: RegistryError<&str, u32> = RegistryError::AlreadyBound {
            key: "port",
            existing: Arc::new(80),
            rejected: Arc::new(8080),
        };
        assert_eq!(err.to_string(), "port is already bound to 80, cannot bind to 8080");
    }

    #[test]
    fn test_debug_format() {
        let err: RegistryError<&str, u32> = RegistryError::NotFound { key: "empty" };
        assert_eq!(format!("{:?}", err), "NotFound { key: \"empty\" }");
    }

    #[test]
    fn test_equality() {
        let a: RegistryError<&str, u32> = RegistryError::NotFound { key: "a" };
        let b: RegistryError<&str, u32> = RegistryError::NotFound { key: "b" };
        assert_eq!(a, RegistryError::NotFound { key: "a" });
        assert_ne!(a, b);
    }

    #[test]
    fn test_error_trait() {
        let err: RegistryError<&str, u32> = RegistryError::NotFound { key: "empty" };
        let err: &dyn std::error::Error = &err;
        assert_eq!(err.to_string(), "no value bound for empty");
    }
}
