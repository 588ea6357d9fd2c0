//! Key Module
//!
//! Key validation and namespacing shared by both cache facades.

use crate::cache::{Ttl, MAX_KEY_LENGTH, RESERVED_KEY_CHARS};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Validate Key ==
/// Validates a composed (already namespaced) key.
///
/// Rules, in order: the empty key is rejected; the literal `"0"` is always
/// accepted; keys longer than [`MAX_KEY_LENGTH`] bytes are rejected; keys
/// containing any of [`RESERVED_KEY_CHARS`] are rejected.
pub fn validate_key(composed: &str) -> Result<()> {
    if composed.is_empty() {
        return Err(CacheError::InvalidKey(composed.to_string()));
    }

    if composed == "0" {
        return Ok(());
    }

    if composed.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(composed.to_string()));
    }

    if composed.contains(|c: char| RESERVED_KEY_CHARS.contains(c)) {
        return Err(CacheError::InvalidKey(composed.to_string()));
    }

    Ok(())
}

// == Key Space ==
/// Namespace and expiry policy of one facade instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySpace {
    namespace: String,
    max_ttl: Option<i64>,
}

impl KeySpace {
    // == Constructor ==
    /// Creates a key space with the given namespace and no TTL cap.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            max_ttl: None,
        }
    }

    /// Creates a key space from the namespace and TTL cap in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            namespace: config.namespace.clone(),
            max_ttl: config.max_ttl,
        }
    }

    // == Max TTL ==
    /// Sets the upper bound applied to positive TTLs.
    pub fn with_max_ttl(mut self, max_ttl: Option<i64>) -> Self {
        self.max_ttl = max_ttl;
        self
    }

    // == Accessors ==
    /// Returns the prefix prepended to every caller key.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the TTL cap, None meaning TTLs pass through unchanged.
    pub fn max_ttl(&self) -> Option<i64> {
        self.max_ttl
    }

    // == Compose ==
    /// Prefixes `key` with the namespace and validates the result.
    ///
    /// The namespace is concatenated verbatim, so a namespace carrying a
    /// reserved character makes every key invalid.
    pub fn compose(&self, key: &str) -> Result<String> {
        let composed = format!("{}{}", self.namespace, key);
        validate_key(&composed)?;
        Ok(composed)
    }

    // == Expiry ==
    /// Converts a TTL into the seconds count handed to the Store.
    pub fn expiry(&self, ttl: &Ttl) -> i64 {
        self.clamp(ttl.normalize())
    }

    /// Applies the optional maximum to a positive seconds count.
    pub fn clamp(&self, seconds: i64) -> i64 {
        match self.max_ttl {
            Some(max) if seconds > max => max,
            _ => seconds,
        }
    }
}
