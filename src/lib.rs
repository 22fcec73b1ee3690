//! Named Cache - lazily created caches configured per name.
//!
//! ## Architecture
//!
//! - `cache` - Registry, spec resolution and the Moka-backed engine
//! - `config` - Environment configuration and spec sources

pub mod cache;
pub mod config;
