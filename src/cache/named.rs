//! Named cache wrapper around Moka.

use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::sync::Cache;

use super::CacheSpec;

/// A named cache that provides a clean API over Moka.
///
/// This cache is:
/// - Thread-safe (uses Arc internally)
/// - Bound to the name it was registered under
/// - Clone-friendly (cloning is cheap, shares the same underlying cache)
pub struct NamedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Cache<K, V>>,
    name: Arc<str>,
    spec: Option<Arc<str>>,
    stats: Option<Arc<Counters>>,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Hit/miss counts for caches built with `recordStats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Total lookups counted.
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }
}

// Manual Clone implementation that doesn't require K: Clone, V: Clone
impl<K, V> Clone for NamedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            name: Arc::clone(&self.name),
            spec: self.spec.clone(),
            stats: self.stats.clone(),
        }
    }
}

impl<K, V> NamedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Build a cache from parsed options.
    ///
    /// `raw` is the spec string the options came from, `None` when the
    /// cache is built from the default spec.
    pub fn new(name: impl Into<Arc<str>>, spec: &CacheSpec, raw: Option<&str>) -> Self {
        Self {
            inner: Arc::new(spec.builder().build()),
            name: name.into(),
            spec: raw.map(Arc::from),
            stats: spec.record_stats.then(Arc::default),
        }
    }

    /// Get the name of this cache.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The spec string this cache was built from.
    pub fn spec(&self) -> Option<&str> {
        self.spec.as_deref()
    }

    /// Whether this cache was built from the default spec.
    pub fn is_default(&self) -> bool {
        self.spec.is_none()
    }

    /// Whether both handles share the same underlying cache.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Insert a key-value pair into the cache.
    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    /// Get a value from the cache.
    ///
    /// Returns `Some(value)` if the key exists and hasn't expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let value = self.inner.get(key);
        self.record(value.is_some());
        value
    }

    /// Check if a key exists in the cache.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Remove a key from the cache.
    pub fn invalidate(&self, key: &K) {
        self.inner.invalidate(key);
    }

    /// Remove all entries from the cache.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get the number of entries in the cache.
    ///
    /// Note: This may not be perfectly accurate due to concurrent operations.
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    /// Get or insert a value using a closure.
    ///
    /// Counts a miss when `f` produced the value, a hit otherwise.
    pub fn get_or_insert_with<F>(&self, key: K, f: F) -> V
    where
        F: FnOnce() -> V,
    {
        let entry = self.inner.entry(key).or_insert_with(f);
        self.record(!entry.is_fresh());
        entry.into_value()
    }

    fn record(&self, hit: bool) {
        if let Some(stats) = &self.stats {
            let counter = if hit { &stats.hits } else { &stats.misses };
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Hit/miss counts, if this cache records them.
    pub fn stats(&self) -> Option<CacheStats> {
        self.stats.as_ref().map(|s| CacheStats {
            hits: s.hits.load(Ordering::Relaxed),
            misses: s.misses.load(Ordering::Relaxed),
        })
    }
}

impl<K, V> std::fmt::Debug for NamedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedCache")
            .field("name", &self.name)
            .field("spec", &self.spec)
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_entries() {
        let cache: NamedCache<u32, String> = NamedCache::new("users", &CacheSpec::default(), None);
        let other = cache.clone();

        other.insert(1, "one".to_string());

        assert!(cache.ptr_eq(&other));
        assert_eq!(cache.get(&1), Some("one".to_string()));
        assert_eq!(cache.entry_count(), 1);

        cache.invalidate(&1);
        assert!(!other.contains(&1));
    }

    #[test]
    fn test_stats_only_when_requested() {
        let plain: NamedCache<u32, u32> = NamedCache::new("plain", &CacheSpec::default(), None);
        plain.get(&1);
        assert_eq!(plain.stats(), None);

        let spec = CacheSpec::parse("recordStats").unwrap();
        let counted: NamedCache<u32, u32> = NamedCache::new("counted", &spec, Some("recordStats"));
        counted.insert(1, 10);
        counted.get(&1);
        counted.get(&2);

        let stats = counted.stats().unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.requests(), 2);
        assert_eq!(counted.spec(), Some("recordStats"));
        assert!(!counted.is_default());
    }

    #[test]
    fn test_get_or_insert_with() {
        let cache: NamedCache<&'static str, u32> = NamedCache::new("lazy", &CacheSpec::default(), None);

        assert_eq!(cache.get_or_insert_with("a", || 1), 1);
        assert_eq!(cache.get_or_insert_with("a", || 2), 1);
    }

    #[test]
    fn test_get_or_insert_with_records_stats() {
        let spec = CacheSpec::parse("recordStats").unwrap();
        let cache: NamedCache<u32, u32> = NamedCache::new("loaded", &spec, Some("recordStats"));

        assert_eq!(cache.get_or_insert_with(1, || 1), 1);
        assert_eq!(cache.get_or_insert_with(1, || 2), 1);
        cache.get(&1);

        assert_eq!(cache.stats(), Some(CacheStats { hits: 2, misses: 1 }));
    }
}
