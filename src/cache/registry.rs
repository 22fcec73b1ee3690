//! Cache registry - Central management for all named caches.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use super::{CacheEngine, SpecProvider, SpecResolver};

/// Central registry handing out one cache per name.
///
/// Caches are created lazily on first [`get`](Self::get), configured by the
/// spec the provider has for that name, and never replaced afterwards.
///
/// ## Example
///
/// ```rust
/// use named_cache::cache::{CacheRegistry, MokaEngine, StaticSpecs};
///
/// let specs = StaticSpecs::new().with("users", "maximumSize=1000");
/// let registry = CacheRegistry::new(specs, MokaEngine::<i64, String>::new());
///
/// let users = registry.get("users");
/// users.insert(1, "alice".to_string());
///
/// // Later, the same cache is returned
/// assert_eq!(registry.get("users").get(&1), Some("alice".to_string()));
/// ```
pub struct CacheRegistry<P, E: CacheEngine> {
    /// One slot per requested name. A slot is inserted before its cache is
    /// built; the cell is filled exactly once.
    caches: DashMap<String, Arc<OnceCell<E::Cache>>>,
    resolver: SpecResolver<P>,
    engine: E,
}

impl<P, E> CacheRegistry<P, E>
where
    P: SpecProvider,
    E: CacheEngine,
{
    /// Create a new empty cache registry.
    pub fn new(provider: P, engine: E) -> Self {
        info!("Cache registry initialized");
        Self {
            caches: DashMap::new(),
            resolver: SpecResolver::new(provider),
            engine,
        }
    }

    /// Get the cache for `name`, creating it on first use.
    ///
    /// Concurrent first calls for the same name build exactly one cache; the
    /// others wait for it. Calls for other names are not held up.
    pub fn get(&self, name: &str) -> E::Cache {
        let existing = self.caches.get(name).and_then(|slot| slot.value().get().cloned());
        if let Some(cache) = existing {
            return cache;
        }

        // The shard lock is released before building.
        let slot = Arc::clone(self.caches.entry(name.to_string()).or_default().value());

        slot.get_or_init(|| {
            debug!("Creating cache: [{}]", name);
            self.resolver.build(name, &self.engine)
        })
        .clone()
    }

    /// Names of all caches created so far.
    pub fn cache_names(&self) -> HashSet<String> {
        self.caches
            .iter()
            .filter(|slot| slot.value().get().is_some())
            .map(|slot| slot.key().clone())
            .collect()
    }

    /// Check if a cache with the given name has been created.
    pub fn contains(&self, name: &str) -> bool {
        self.caches
            .get(name)
            .is_some_and(|slot| slot.value().get().is_some())
    }

    /// Get the number of created caches.
    pub fn len(&self) -> usize {
        self.caches
            .iter()
            .filter(|slot| slot.value().get().is_some())
            .count()
    }

    /// Check if no cache has been created yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The spec provider this registry resolves from.
    pub fn provider(&self) -> &P {
        self.resolver.provider()
    }

    /// The engine this registry builds caches with.
    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<P, E> std::fmt::Debug for CacheRegistry<P, E>
where
    P: SpecProvider,
    E: CacheEngine,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.cache_names();
        f.debug_struct("CacheRegistry")
            .field("cache_count", &names.len())
            .field("cache_names", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MokaEngine, NoSpecs, StaticSpecs};

    #[test]
    fn test_get_returns_same_instance() {
        let registry = CacheRegistry::new(NoSpecs, MokaEngine::<u32, u32>::new());

        let first = registry.get("orders");
        first.insert(1, 1);
        let second = registry.get("orders");

        assert!(first.ptr_eq(&second));
        assert_eq!(second.get(&1), Some(1));
    }

    #[test]
    fn test_empty_name_is_a_valid_key() {
        let registry = CacheRegistry::new(NoSpecs, MokaEngine::<u32, u32>::new());

        let cache = registry.get("");

        assert_eq!(cache.name(), "");
        assert!(cache.ptr_eq(&registry.get("")));
        assert!(registry.contains(""));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_and_len() {
        let registry = CacheRegistry::new(
            StaticSpecs::new().with("tokens", "maximumSize=10"),
            MokaEngine::<u32, u32>::new(),
        );
        assert!(registry.is_empty());
        assert!(!registry.contains("tokens"));

        registry.get("tokens");
        registry.get("orders");
        registry.get("tokens");

        let names = registry.cache_names();
        assert_eq!(names.len(), 2);
        assert!(names.contains("tokens"));
        assert!(names.contains("orders"));
        assert_eq!(registry.len(), 2);
    }
}
