//! Process configuration for the curve cache.
//!
//! Scoped to the one knob this component owns: how many solved curves the
//! cache holds. Log verbosity is the standard `RUST_LOG` /
//! `tracing_subscriber::EnvFilter` convention, read directly by whatever
//! binary hosts this crate (see `convex-server::main`) rather than routed
//! through this struct. Everything else (bind address, storage paths, ...)
//! belongs to the surrounding server process and is configured there.

use serde::{Deserialize, Serialize};

fn default_cache_capacity() -> usize {
    1024
}

/// Curve-cache process configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of solved curves the cache holds before evicting
    /// the least-recently-used entry.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl CacheConfig {
    /// Builds a config from defaults with environment variable overrides
    /// applied.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Applies environment variable overrides to the configuration.
    ///
    /// Supported variables:
    /// - `CONVEX_CACHE_CAPACITY` - maximum cached curves (default: 1024)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(capacity) = std::env::var("CONVEX_CACHE_CAPACITY") {
            if let Ok(parsed) = capacity.parse::<usize>() {
                self.cache_capacity = parsed;
            }
        }
    }

    /// Every environment variable name this config reads, for
    /// documentation and debugging.
    #[must_use]
    pub fn env_var_names() -> &'static [&'static str] {
        &["CONVEX_CACHE_CAPACITY"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_match_documented_values() {
        let config = CacheConfig::default();
        assert_eq!(config.cache_capacity, 1024);
    }

    #[test]
    fn env_override_replaces_capacity() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("CONVEX_CACHE_CAPACITY", "64");
        let config = CacheConfig::from_env();
        assert_eq!(config.cache_capacity, 64);
        std::env::remove_var("CONVEX_CACHE_CAPACITY");
    }

    #[test]
    fn malformed_env_capacity_is_ignored() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("CONVEX_CACHE_CAPACITY", "not-a-number");
        let config = CacheConfig::from_env();
        assert_eq!(config.cache_capacity, 1024);
        std::env::remove_var("CONVEX_CACHE_CAPACITY");
    }
}
