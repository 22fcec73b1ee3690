//! Named Cache - start-up binary.
//!
//! Builds the cache registry from the environment, creates the caches listed
//! in `CACHE_NAMES` and reports how each one was configured.

use tracing::info;
use tracing_subscriber::EnvFilter;

use named_cache::cache::{CacheRegistry, MokaEngine};
use named_cache::config::Config;

fn main() -> anyhow::Result<()> {
    // .env may set RUST_LOG, so read it before the filter
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("named_cache=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting named cache registry...");

    let config = Config::from_env();
    info!("Configuration loaded successfully");
    info!("Spec variable prefix: {}", config.spec_prefix);

    let provider = config.spec_provider()?;
    if let Some(path) = &config.specs_file {
        info!("Specs file: {}", path.display());
    }

    let registry = CacheRegistry::new(provider, MokaEngine::<String, String>::new());

    if config.cache_names.is_empty() {
        info!("No caches to warm (CACHE_NAMES is empty)");
    }

    for name in &config.cache_names {
        let cache = registry.get(name);
        match cache.spec() {
            Some(spec) => info!("Cache [{}] ready with spec '{}'", name, spec),
            None => info!("Cache [{}] ready with default spec", name),
        }
    }

    info!("{} cache(s) registered: {:?}", registry.len(), registry.cache_names());

    Ok(())
}
