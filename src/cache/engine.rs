//! Cache engines - the builders behind the registry.

use std::hash::Hash;
use std::marker::PhantomData;

use super::spec::DEFAULT_SPEC;
use super::{CacheSpec, NamedCache, SpecError};

/// Builds cache instances for the registry.
///
/// The spec string grammar belongs to the engine; the registry only decides
/// whether a string is passed through or the default is used instead.
pub trait CacheEngine: Send + Sync {
    type Cache: Clone + Send + Sync + 'static;

    /// Build a cache from a non-blank spec string.
    fn build_from_spec(&self, name: &str, spec: &str) -> Result<Self::Cache, SpecError>;

    /// Build a cache from the default spec. Must not fail.
    fn build_default(&self, name: &str) -> Self::Cache;
}

/// Engine producing Moka-backed [`NamedCache`]s.
pub struct MokaEngine<K, V> {
    _types: PhantomData<fn() -> (K, V)>,
}

impl<K, V> MokaEngine<K, V> {
    /// Create an engine for `NamedCache<K, V>`.
    pub fn new() -> Self {
        Self {
            _types: PhantomData,
        }
    }
}

impl<K, V> Default for MokaEngine<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for MokaEngine<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaEngine")
            .field("key", &std::any::type_name::<K>())
            .field("value", &std::any::type_name::<V>())
            .finish()
    }
}

impl<K, V> CacheEngine for MokaEngine<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    type Cache = NamedCache<K, V>;

    fn build_from_spec(&self, name: &str, spec: &str) -> Result<Self::Cache, SpecError> {
        let parsed = CacheSpec::parse(spec)?;
        Ok(NamedCache::new(name, &parsed, Some(spec)))
    }

    fn build_default(&self, name: &str) -> Self::Cache {
        NamedCache::new(name, &DEFAULT_SPEC, None)
    }
}
