//! Configuration Module
//!
//! Handles loading adapter configuration from environment variables.

use std::env;

/// Adapter configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix prepended verbatim to every caller key
    pub namespace: String,
    /// Upper bound applied to positive TTLs before they reach the Store, None = pass-through
    pub max_ttl: Option<i64>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAMESPACE` - Key prefix (default: empty)
    /// - `CACHE_MAX_TTL` - Maximum TTL in seconds (default: unset)
    pub fn from_env() -> Self {
        Self {
            namespace: env::var("CACHE_NAMESPACE").unwrap_or_default(),
            max_ttl: env::var("CACHE_MAX_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ttl: &i64| *ttl > 0),
        }
    }

    /// Returns a copy of this config using the given namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            max_ttl: None,
        }
    }
}
