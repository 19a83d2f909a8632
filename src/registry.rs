//! Component Registry
//!
//! A named registry that makes long-lived components discoverable by symbolic
//! name. Registration is an explicit call; resolution is typed. Nothing is
//! scanned, reflected over, or constructed on demand - the registry only hands
//! back what was put in.
//!
//! # Thread Safety
//!
//! The registry wraps its map in `Arc<RwLock<>>` so clones share one
//! underlying map and reads (resolution) never block each other. Writes
//! (registration) are expected to happen once, during process startup.
//!
//! # Ownership
//!
//! Entries are held as `Arc` clones. The registry keeps components reachable
//! but does not control their lifetime: a component shared elsewhere outlives
//! its registry entry, and unregistering never tears anything down.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

/// Errors from registry resolution
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No component is registered under the requested name
    #[error("no component registered under {name:?}")]
    NotRegistered {
        /// The name that was looked up
        name: String,
    },

    /// A component is registered under the name, but with a different type
    #[error("component {name:?} is registered with a different type")]
    TypeMismatch {
        /// The name that was looked up
        name: String,
    },
}

/// Registry mapping symbolic names to shared components
///
/// Clones are cheap and share the same underlying map.
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    /// Inner map of name to type-erased component
    inner: Arc<RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>>,
}

impl ComponentRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under a symbolic name
    ///
    /// Returns the previously registered entry if the name was already taken.
    pub fn register<T>(
        &self,
        name: impl Into<String>,
        component: Arc<T>,
    ) -> Option<Arc<dyn Any + Send + Sync>>
    where
        T: Send + Sync + 'static,
    {
        let name = name.into();
        let previous = self.inner.write().insert(name.clone(), component);
        tracing::info!(
            component = %name,
            replaced = previous.is_some(),
            "Component registered"
        );
        previous
    }

    /// Resolve a component by name, downcast to its concrete type
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotRegistered`] if the name is unknown,
    /// [`RegistryError::TypeMismatch`] if the entry under that name is of a
    /// different type than requested.
    pub fn resolve<T>(&self, name: &str) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
    {
        let entry = self
            .inner
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotRegistered {
                name: name.to_string(),
            })?;

        entry
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                name: name.to_string(),
            })
    }

    /// Remove a component from the registry
    ///
    /// Returns the entry if it was registered. The component itself stays
    /// alive for as long as anyone holds an `Arc` to it.
    pub fn unregister(&self, name: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        let entry = self.inner.write().remove(name);
        if entry.is_some() {
            tracing::info!(component = %name, "Component unregistered");
        }
        entry
    }

    /// Check if a name is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().contains_key(name)
    }

    /// Number of registered components
    #[must_use]
    pub fn count(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Names of all registered components
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.inner.read().keys().cloned().collect()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("ComponentRegistry")
            .field("count", &inner.len())
            .field("names", &inner.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let registry = ComponentRegistry::new();
        let component = Arc::new(String::from("hello"));

        assert!(registry.register("greeting", Arc::clone(&component)).is_none());
        assert_eq!(registry.count(), 1);
        assert!(registry.contains("greeting"));

        let resolved = registry.resolve::<String>("greeting").unwrap();
        assert!(Arc::ptr_eq(&component, &resolved));
    }

    #[test]
    fn test_resolve_unknown_name() {
        let registry = ComponentRegistry::new();
        let result = registry.resolve::<String>("missing");
        assert_eq!(
            result.err(),
            Some(RegistryError::NotRegistered {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_wrong_type() {
        let registry = ComponentRegistry::new();
        registry.register("answer", Arc::new(42_u64));

        let result = registry.resolve::<String>("answer");
        assert_eq!(
            result.err(),
            Some(RegistryError::TypeMismatch {
                name: "answer".to_string()
            })
        );

        // The right type still resolves.
        assert_eq!(*registry.resolve::<u64>("answer").unwrap(), 42);
    }

    #[test]
    fn test_register_replaces_and_returns_previous() {
        let registry = ComponentRegistry::new();
        registry.register("component", Arc::new(1_u32));

        let previous = registry.register("component", Arc::new(2_u32));
        assert!(previous.is_some());
        assert_eq!(*registry.resolve::<u32>("component").unwrap(), 2);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_unregister() {
        let registry = ComponentRegistry::new();
        let component = Arc::new(5_u8);
        registry.register("byte", Arc::clone(&component));

        assert!(registry.unregister("byte").is_some());
        assert!(!registry.contains("byte"));
        assert!(registry.unregister("byte").is_none());

        // Unregistering does not drop the component for other holders.
        assert_eq!(*component, 5);
    }

    #[test]
    fn test_names_and_empty() {
        let registry = ComponentRegistry::new();
        assert!(registry.is_empty());

        registry.register("a", Arc::new(1_u32));
        registry.register("b", Arc::new(2_u32));

        let mut names = registry.names();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_clone_is_shared() {
        let registry1 = ComponentRegistry::new();
        let registry2 = registry1.clone();

        registry1.register("shared", Arc::new(true));
        assert!(registry2.contains("shared"));
        assert_eq!(registry2.count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_registration() {
        use tokio::task::JoinSet;

        let registry = ComponentRegistry::new();
        let mut join_set = JoinSet::new();

        for i in 0..10 {
            let registry = registry.clone();
            join_set.spawn(async move {
                registry.register(format!("component-{i}"), Arc::new(i));
            });
        }

        while join_set.join_next().await.is_some() {}
        assert_eq!(registry.count(), 10);
    }
}
