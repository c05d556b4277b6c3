//! Configuration Module
//!
//! Handles loading the cache configuration from environment variables.

use std::env;

use tracing::warn;

use crate::error::{CacheError, Result};

/// Environment variable holding the cache capacity.
pub const MAX_SIZE_ENV: &str = "CACHE_MAX_SIZE";

/// Capacity used when nothing is configured.
pub const DEFAULT_MAX_SIZE: u32 = 1000;

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold. `0` stores nothing.
    pub max_size: u32,
}

impl CacheConfig {
    /// Creates a config with the given capacity.
    pub fn new(max_size: u32) -> Self {
        Self { max_size }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    ///
    /// Unparsable values fall back to the default with a warning.
    pub fn from_env() -> Self {
        match Self::try_from_env() {
            Ok(config) => config,
            Err(err) => {
                warn!("{}, using default max_size={}", err, DEFAULT_MAX_SIZE);
                Self::default()
            }
        }
    }

    /// Same as [`CacheConfig::from_env`] but reports unparsable values.
    pub fn try_from_env() -> Result<Self> {
        match env::var(MAX_SIZE_ENV) {
            Ok(raw) => parse_max_size(&raw).map(Self::new),
            Err(_) => Ok(Self::default()),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

fn parse_max_size(raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| CacheError::InvalidConfig(format!("{}={:?}", MAX_SIZE_ENV, raw)))
}
