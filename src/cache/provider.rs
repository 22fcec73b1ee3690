//! Spec providers - where per-cache spec strings come from.

use std::collections::HashMap;
use std::env;

/// Supplies the optional spec string for a cache name.
///
/// Implementations must be side-effect free; the registry asks at most once
/// per name.
pub trait SpecProvider: Send + Sync {
    fn spec_for_cache(&self, name: &str) -> Option<String>;
}

impl<F> SpecProvider for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn spec_for_cache(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Provider with no specs; every cache uses the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpecs;

impl SpecProvider for NoSpecs {
    fn spec_for_cache(&self, _name: &str) -> Option<String> {
        None
    }
}

/// In-memory name → spec table.
#[derive(Debug, Clone, Default)]
pub struct StaticSpecs {
    specs: HashMap<String, String>,
}

impl StaticSpecs {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a spec for a cache (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
        self.specs.insert(name.into(), spec.into());
        self
    }

    /// Number of specs in the table.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the table has no specs.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<N, S> FromIterator<(N, S)> for StaticSpecs
where
    N: Into<String>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, S)>>(iter: I) -> Self {
        Self {
            specs: iter
                .into_iter()
                .map(|(name, spec)| (name.into(), spec.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for StaticSpecs {
    fn from(specs: HashMap<String, String>) -> Self {
        Self { specs }
    }
}

impl SpecProvider for StaticSpecs {
    fn spec_for_cache(&self, name: &str) -> Option<String> {
        self.specs.get(name).cloned()
    }
}

/// Reads specs from environment variables named `<prefix><NAME>`.
///
/// The cache name is upper-cased and every non-alphanumeric character is
/// replaced with `_`, so `user-sessions` is looked up as
/// `CACHE_SPEC_USER_SESSIONS` with the default prefix.
#[derive(Debug, Clone)]
pub struct EnvSpecs {
    prefix: String,
}

impl EnvSpecs {
    /// Create a provider reading variables that start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The variable consulted for `name`.
    pub fn var_name(&self, name: &str) -> String {
        let suffix: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", self.prefix, suffix)
    }
}

impl SpecProvider for EnvSpecs {
    fn spec_for_cache(&self, name: &str) -> Option<String> {
        env::var(self.var_name(name)).ok()
    }
}

/// Ordered providers; the first one that has a spec wins.
#[derive(Default)]
pub struct LayeredSpecs {
    layers: Vec<Box<dyn SpecProvider>>,
}

impl LayeredSpecs {
    /// Create a provider with no layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lower-priority layer (builder pattern).
    #[must_use]
    pub fn layer(mut self, provider: impl SpecProvider + 'static) -> Self {
        self.layers.push(Box::new(provider));
        self
    }
}

impl SpecProvider for LayeredSpecs {
    fn spec_for_cache(&self, name: &str) -> Option<String> {
        self.layers.iter().find_map(|p| p.spec_for_cache(name))
    }
}

impl std::fmt::Debug for LayeredSpecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredSpecs")
            .field("layers", &self.layers.len())
            .finish()
    }
}
