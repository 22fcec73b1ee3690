//! Configuration module.
//!
//! Loads configuration from environment variables (and `.env`).
//!
//! | variable            | meaning                                        |
//! |---------------------|------------------------------------------------|
//! | `CACHE_SPEC_PREFIX` | prefix of per-cache spec variables             |
//! | `CACHE_SPECS_FILE`  | optional JSON object of name to spec string    |
//! | `CACHE_NAMES`       | comma-separated caches to create at start-up   |

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::cache::{EnvSpecs, LayeredSpecs, StaticSpecs};

pub const DEFAULT_SPEC_PREFIX: &str = "CACHE_SPEC_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read specs file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid specs file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Layout of the specs file: a flat object of name to spec string.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
struct SpecsFile(HashMap<String, String>);

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix for per-cache spec variables, e.g. `CACHE_SPEC_TOKENS`.
    pub spec_prefix: String,

    /// JSON file with more specs; environment variables take precedence.
    pub specs_file: Option<PathBuf>,

    /// Caches to create eagerly at start-up.
    pub cache_names: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let spec_prefix = lookup("CACHE_SPEC_PREFIX")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SPEC_PREFIX.to_string());

        let specs_file = lookup("CACHE_SPECS_FILE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        // Parse cache names
        let cache_names = lookup("CACHE_NAMES")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            spec_prefix,
            specs_file,
            cache_names,
        }
    }

    /// Spec provider for this configuration: environment first, then the
    /// specs file if one is configured.
    pub fn spec_provider(&self) -> Result<LayeredSpecs, ConfigError> {
        let mut provider = LayeredSpecs::new().layer(EnvSpecs::new(self.spec_prefix.clone()));

        if let Some(path) = &self.specs_file {
            provider = provider.layer(load_specs_file(path)?);
        }

        Ok(provider)
    }
}

/// Read a specs file from disk.
pub fn load_specs_file(path: &Path) -> Result<StaticSpecs, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_specs(&contents)
}

/// Parse the JSON layout `{"<name>": "<spec>", ..}`.
///
/// Every value must be a string, so nested layouts are rejected instead of
/// loading as an empty table.
pub fn parse_specs(json: &str) -> Result<StaticSpecs, ConfigError> {
    let SpecsFile(specs) = serde_json::from_str(json)?;
    Ok(specs.into())
}
