//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `TAMARIND_DATA_DIR` - Directory for persisted state (default: `./data`)
//! - `TAMARIND_STORAGE_KEY` - Namespaced persistence key (default:
//!   `ecommerce-storage`)
//! - `TAMARIND_PAGE_SIZE` - Default listing page size (default: 10)
//! - `TAMARIND_SEARCH_DEBOUNCE_MS` - Search quiet period in milliseconds
//!   (default: 300)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_STORAGE_KEY: &str = "ecommerce-storage";
const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set to an unparseable value.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding persisted state documents.
    pub data_dir: PathBuf,
    /// Namespaced key the persisted projection is stored under.
    pub storage_key: String,
    /// Default page size for listings.
    pub page_size: usize,
    /// Quiet period for debounced search input.
    pub search_debounce: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    /// Every variable falls back to its default when unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = PathBuf::from(get_env_or_default("TAMARIND_DATA_DIR", DEFAULT_DATA_DIR));
        let storage_key = get_env_or_default("TAMARIND_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        let page_size = parse_env("TAMARIND_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let debounce_ms = parse_env("TAMARIND_SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS)?;

        Ok(Self {
            data_dir,
            storage_key,
            page_size,
            search_debounce: Duration::from_millis(debounce_ms),
        })
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.storage_key, "ecommerce-storage");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_parse_env_rejects_garbage() {
        // SAFETY: test-only env mutation; no other thread reads this key.
        unsafe { std::env::set_var("TAMARIND_TEST_PAGE_SIZE", "not-a-number") };
        let result: Result<usize, _> = parse_env("TAMARIND_TEST_PAGE_SIZE", 10);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
        unsafe { std::env::remove_var("TAMARIND_TEST_PAGE_SIZE") };
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: usize = parse_env("TAMARIND_TEST_UNSET", 25).expect("default");
        assert_eq!(value, 25);
    }
}
