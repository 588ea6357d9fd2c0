//! Simple Cache Module
//!
//! Key-value cache contract: get/set/delete/has, their bulk variants, and a
//! namespace-guarded clear.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{entries_from_json, keys_from_json, KeySpace, Ttl};
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::store::Store;

// == Simple Cache ==
/// Key-value facade over a [`Store`].
///
/// Invalid keys always surface as errors. A missing document reads as the
/// caller's default, but any other Store failure on read is returned. Store
/// failures on write are absorbed into `false`.
#[derive(Debug)]
pub struct SimpleCache<S> {
    store: S,
    keys: KeySpace,
}

impl<S: Store> SimpleCache<S> {
    // == Constructor ==
    /// Creates a facade prefixing every key with `namespace`.
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self::with_key_space(store, KeySpace::new(namespace))
    }

    /// Creates a facade using the namespace and TTL cap from `config`.
    pub fn from_config(store: S, config: &Config) -> Self {
        Self::with_key_space(store, KeySpace::from_config(config))
    }

    pub fn with_key_space(store: S, keys: KeySpace) -> Self {
        Self { store, keys }
    }

    pub fn namespace(&self) -> &str {
        self.keys.namespace()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // == Get ==
    /// Returns the stored value, or `default` when the document is absent.
    pub fn get(&self, key: &str, default: Value) -> Result<Value> {
        let key = self.keys.compose(key)?;

        match self.store.fetch(&key) {
            Ok(value) => Ok(value),
            Err(StoreError::NotFound(_)) => {
                debug!(key = %key, "Cache miss");
                Ok(default)
            }
            Err(err) => Err(err.into()),
        }
    }

    // == Set ==
    /// Stores a value. Returns `false` when the Store rejects the write.
    pub fn set(&self, key: &str, value: Value, ttl: impl Into<Ttl>) -> Result<bool> {
        let key = self.keys.compose(key)?;
        let ttl = self.keys.expiry(&ttl.into());

        match self.store.store(&key, value, ttl) {
            Ok(()) => Ok(true),
            Err(err) => {
                warn!(key = %key, error = %err, "Cache write failed");
                Ok(false)
            }
        }
    }

    // == Delete ==
    /// Removes a key. Returns `false` when there was nothing to remove.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let key = self.keys.compose(key)?;

        match self.store.remove(&key) {
            Ok(()) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    // == Has ==
    /// Reports whether the namespaced key exists.
    pub fn has(&self, key: &str) -> Result<bool> {
        let key = self.keys.compose(key)?;
        Ok(self.store.exists(&key))
    }

    // == Clear ==
    /// Flushes the whole Store, only when this facade has no namespace.
    ///
    /// A namespaced facade cannot flush selectively, so it returns `false`
    /// without contacting the Store.
    pub fn clear(&self) -> bool {
        if !self.keys.namespace().is_empty() {
            debug!(namespace = self.keys.namespace(), "Refusing to flush a namespaced cache");
            return false;
        }

        let flushed = self.store.flush_all();
        info!(flushed, "Store flushed");
        flushed
    }

    // == Bulk Operations ==
    /// Reads every key, substituting `default` for absent ones.
    pub fn get_multiple<I, K>(&self, keys: I, default: Value) -> Result<HashMap<String, Value>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut values = HashMap::new();
        for key in keys {
            let key = key.as_ref();
            let value = self.get(key, default.clone())?;
            values.insert(key.to_string(), value);
        }
        Ok(values)
    }

    /// Writes every pair, stopping at the first write that returns `false`.
    pub fn set_multiple<I, K>(&self, values: I, ttl: impl Into<Ttl>) -> Result<bool>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let ttl = ttl.into();
        for (key, value) in values {
            if !self.set(key.as_ref(), value, ttl)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Deletes every key, stopping at the first delete that returns `false`.
    pub fn delete_multiple<I, K>(&self, keys: I) -> Result<bool>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            if !self.delete(key.as_ref())? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// [`SimpleCache::get_multiple`] taking a JSON array of keys.
    pub fn get_multiple_json(&self, keys: &Value, default: Value) -> Result<HashMap<String, Value>> {
        self.get_multiple(keys_from_json(keys)?, default)
    }

    /// [`SimpleCache::set_multiple`] taking a JSON object of key => value.
    pub fn set_multiple_json(&self, values: &Value, ttl: impl Into<Ttl>) -> Result<bool> {
        self.set_multiple(entries_from_json(values)?, ttl)
    }

    /// [`SimpleCache::delete_multiple`] taking a JSON array of keys.
    pub fn delete_multiple_json(&self, keys: &Value) -> Result<bool> {
        self.delete_multiple(keys_from_json(keys)?)
    }
}
