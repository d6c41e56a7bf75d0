//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `VARCACHE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_VARIANTS, SEARCH_CACHE_TTL};
use crate::search::SearchSettings;

/// Search service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `VARCACHE_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Load-all ceiling. Default: `3000`.
    pub max_variants: u64,

    /// Lifetime of a cached search result, in seconds. Default: two weeks.
    pub cache_ttl_secs: u64,

    /// Page size when a caller does not give one. Default: `100`.
    pub page_size: usize,

    /// Max entries held by the in-process cache store. Default: `10_000`.
    pub store_capacity: u64,

    /// JSON variant corpus for the in-memory backend.
    pub index_path: Option<PathBuf>,
}

/// Default entry count of the in-process cache store.
pub const DEFAULT_STORE_CAPACITY: u64 = 10_000;

impl Default for Config {
    fn default() -> Self {
        Self {
            max_variants: MAX_VARIANTS,
            cache_ttl_secs: SEARCH_CACHE_TTL.as_secs(),
            page_size: DEFAULT_PAGE_SIZE,
            store_capacity: DEFAULT_STORE_CAPACITY,
            index_path: None,
        }
    }
}

impl Config {
    const ENV_MAX_VARIANTS: &'static str = "VARCACHE_MAX_VARIANTS";
    const ENV_CACHE_TTL_SECS: &'static str = "VARCACHE_CACHE_TTL_SECS";
    const ENV_PAGE_SIZE: &'static str = "VARCACHE_PAGE_SIZE";
    const ENV_STORE_CAPACITY: &'static str = "VARCACHE_STORE_CAPACITY";
    const ENV_INDEX_PATH: &'static str = "VARCACHE_INDEX_PATH";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            max_variants: Self::parse_number_from_env(Self::ENV_MAX_VARIANTS, defaults.max_variants)?,
            cache_ttl_secs: Self::parse_number_from_env(
                Self::ENV_CACHE_TTL_SECS,
                defaults.cache_ttl_secs,
            )?,
            page_size: Self::parse_number_from_env(Self::ENV_PAGE_SIZE, defaults.page_size)?,
            store_capacity: Self::parse_number_from_env(
                Self::ENV_STORE_CAPACITY,
                defaults.store_capacity,
            )?,
            index_path: Self::parse_optional_path_from_env(Self::ENV_INDEX_PATH),
        })
    }

    /// Rejects zero limits and an index path that is not a readable file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zero_checks = [
            (Self::ENV_MAX_VARIANTS, self.max_variants),
            (Self::ENV_CACHE_TTL_SECS, self.cache_ttl_secs),
            (Self::ENV_PAGE_SIZE, self.page_size as u64),
            (Self::ENV_STORE_CAPACITY, self.store_capacity),
        ];
        for (name, value) in zero_checks {
            if value == 0 {
                return Err(ConfigError::ZeroValue { name });
            }
        }

        if let Some(ref path) = self.index_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    fn parse_number_from_env<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { name, value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}

impl From<&Config> for SearchSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_variants: config.max_variants,
            cache_ttl: config.cache_ttl(),
            default_page_size: config.page_size,
        }
    }
}
