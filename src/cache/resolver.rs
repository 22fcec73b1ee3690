//! Spec resolution - picks the configuration a cache is built with.
//!
//! Spec strings are operator input. A missing, blank or malformed spec must
//! never stop a cache from being created, so every failure path ends in the
//! default build:
//!
//! | provider returns       | cache is built with | log    |
//! |------------------------|---------------------|--------|
//! | nothing                | default             | -      |
//! | blank string           | default             | warn   |
//! | spec accepted          | that spec           | -      |
//! | spec rejected          | default             | error  |

use tracing::{debug, error, warn};

use super::{CacheEngine, SpecProvider};

/// What a cache should be built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildConfig {
    Default,
    /// A non-blank spec string, passed to the engine unmodified.
    Spec(String),
}

/// Applies the fallback policy on top of a [`SpecProvider`].
#[derive(Debug)]
pub struct SpecResolver<P> {
    provider: P,
}

impl<P: SpecProvider> SpecResolver<P> {
    /// Create a resolver over `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The underlying spec provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Decide between the provider's spec and the default.
    pub fn resolve(&self, name: &str) -> BuildConfig {
        match self.provider.spec_for_cache(name) {
            None => {
                debug!("No spec for cache [{}], using default", name);
                BuildConfig::Default
            }
            Some(spec) if spec.trim().is_empty() => {
                warn!(
                    "Spec for cache [{}] is present but empty, using default",
                    name
                );
                BuildConfig::Default
            }
            Some(spec) => BuildConfig::Spec(spec),
        }
    }

    /// Resolve and build. Never fails: a rejected spec is logged and
    /// replaced by the default build.
    pub fn build<E: CacheEngine>(&self, name: &str, engine: &E) -> E::Cache {
        match self.resolve(name) {
            BuildConfig::Default => engine.build_default(name),
            BuildConfig::Spec(spec) => match engine.build_from_spec(name, &spec) {
                Ok(cache) => {
                    debug!("Cache [{}] built from spec '{}'", name, spec);
                    cache
                }
                Err(e) => {
                    error!(
                        "Unable to create cache [{}] from spec '{}': {}. Using default",
                        name, spec, e
                    );
                    engine.build_default(name)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MokaEngine, NoSpecs, StaticSpecs};

    #[test]
    fn test_resolve_states() {
        let resolver = SpecResolver::new(
            StaticSpecs::new()
                .with("sessions", "")
                .with("blank", "   ")
                .with("tokens", "expireAfterAccess=15m")
                .with("broken", "not a real spec"),
        );

        assert_eq!(resolver.resolve("orders"), BuildConfig::Default);
        assert_eq!(resolver.resolve("sessions"), BuildConfig::Default);
        assert_eq!(resolver.resolve("blank"), BuildConfig::Default);
        assert_eq!(
            resolver.resolve("tokens"),
            BuildConfig::Spec("expireAfterAccess=15m".into())
        );
        // Validity is the engine's call, not the resolver's.
        assert_eq!(
            resolver.resolve("broken"),
            BuildConfig::Spec("not a real spec".into())
        );
    }

    #[test]
    fn test_build_falls_back_on_rejected_spec() {
        let resolver = SpecResolver::new(StaticSpecs::new().with("broken", "maximumSize=lots"));
        let cache = resolver.build("broken", &MokaEngine::<u32, u32>::new());

        assert_eq!(cache.name(), "broken");
        assert!(cache.is_default());
    }

    #[test]
    fn test_build_default_without_provider_entry() {
        let resolver = SpecResolver::new(NoSpecs);
        let cache = resolver.build("orders", &MokaEngine::<u32, u32>::new());

        assert!(cache.is_default());
    }
}
