//! Cache module - Named caches configured by spec strings, backed by Moka.
//!
//! ## Architecture
//!
//! The cache system follows a registry pattern:
//! - `CacheRegistry` - Central registry creating one cache per name, lazily
//! - `SpecResolver` - Decides which spec a cache is built from, falling back
//!   to the default when a spec is missing, blank or rejected
//! - `SpecProvider` - Where spec strings come from (env, JSON file, memory)
//! - `CacheEngine` - Builds caches; `MokaEngine` produces `NamedCache`s
//!
//! ## Usage
//!
//! ```rust
//! use named_cache::cache::{CacheRegistry, MokaEngine, StaticSpecs};
//!
//! let specs = StaticSpecs::new().with("tokens", "expireAfterAccess=15m");
//! let registry = CacheRegistry::new(specs, MokaEngine::<u64, String>::new());
//!
//! let tokens = registry.get("tokens");
//! tokens.insert(7, "secret".to_string());
//! assert_eq!(tokens.spec(), Some("expireAfterAccess=15m"));
//!
//! // No spec for "orders", so it gets the defaults
//! assert!(registry.get("orders").is_default());
//! ```

mod engine;
mod error;
mod named;
mod provider;
mod registry;
mod resolver;
mod spec;

pub use engine::{CacheEngine, MokaEngine};
pub use error::SpecError;
pub use named::{CacheStats, NamedCache};
pub use provider::{EnvSpecs, LayeredSpecs, NoSpecs, SpecProvider, StaticSpecs};
pub use registry::CacheRegistry;
pub use resolver::{BuildConfig, SpecResolver};
pub use spec::{CacheSpec, DEFAULT_SPEC};
