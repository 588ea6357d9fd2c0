//! Item Pool Module
//!
//! Item-oriented cache contract with a deferred-write buffer.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{keys_from_json, CacheItem, KeySpace};
use crate::config::Config;
use crate::error::{CacheError, Result, StoreError};
use crate::store::Store;

// == Cache Item Pool ==
/// Item facade over a [`Store`].
///
/// Reads never fail for a missing or broken Store, they return a miss. Only
/// key-shape violations are errors. The deferred buffer belongs to this
/// instance; share it across threads only behind a lock.
#[derive(Debug)]
pub struct CacheItemPool<S> {
    store: S,
    keys: KeySpace,
    /// Items queued by `save_deferred`, last write per key wins
    deferred: HashMap<String, CacheItem>,
}

impl<S: Store> CacheItemPool<S> {
    // == Constructor ==
    /// Creates a pool prefixing every key with `namespace`.
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self::with_key_space(store, KeySpace::new(namespace))
    }

    /// Creates a pool using the namespace and TTL cap from `config`.
    pub fn from_config(store: S, config: &Config) -> Self {
        Self::with_key_space(store, KeySpace::from_config(config))
    }

    pub fn with_key_space(store: S, keys: KeySpace) -> Self {
        Self {
            store,
            keys,
            deferred: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        self.keys.namespace()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // == Get Item ==
    /// Fetches a key into a fresh item, a hit only if the Store returned it.
    pub fn get_item(&self, key: &str) -> Result<CacheItem> {
        let composed = self.keys.compose(key)?;
        let mut item = CacheItem::new(key);

        match self.store.fetch(&composed) {
            Ok(value) => item.mark_hit(value),
            Err(StoreError::NotFound(_)) => debug!(key = %composed, "Cache miss"),
            Err(err) => warn!(key = %composed, error = %err, "Cache read failed, reporting miss"),
        }

        Ok(item)
    }

    /// Fetches every key. Any invalid key fails the whole call.
    pub fn get_items<I, K>(&self, keys: I) -> Result<HashMap<String, CacheItem>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .map(|key| {
                let key = key.as_ref();
                self.get_item(key).map(|item| (key.to_string(), item))
            })
            .collect()
    }

    /// [`CacheItemPool::get_items`] taking a JSON array of keys.
    pub fn get_items_json(&self, keys: &Value) -> Result<HashMap<String, CacheItem>> {
        self.get_items(keys_from_json(keys)?)
    }

    // == Has Item ==
    pub fn has_item(&self, key: &str) -> Result<bool> {
        let composed = self.keys.compose(key)?;
        Ok(self.store.exists(&composed))
    }

    // == Delete ==
    /// Removes a key. Returns `false` when there was nothing to remove.
    pub fn delete_item(&self, key: &str) -> Result<bool> {
        let composed = self.keys.compose(key)?;

        match self.store.remove(&composed) {
            Ok(()) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Removes every key, attempting all of them.
    ///
    /// Returns `true` only if no individual delete returned `false`.
    pub fn delete_items<I, K>(&self, keys: I) -> Result<bool>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut all_removed = true;
        for key in keys {
            all_removed &= self.delete_item(key.as_ref())?;
        }
        Ok(all_removed)
    }

    /// [`CacheItemPool::delete_items`] taking a JSON array of keys.
    pub fn delete_items_json(&self, keys: &Value) -> Result<bool> {
        self.delete_items(keys_from_json(keys)?)
    }

    // == Clear ==
    /// Flushes the whole Store, only when this pool has no namespace.
    ///
    /// A successful flush also discards the deferred buffer.
    pub fn clear(&mut self) -> bool {
        if !self.keys.namespace().is_empty() {
            debug!(namespace = self.keys.namespace(), "Refusing to flush a namespaced pool");
            return false;
        }

        let flushed = self.store.flush_all();
        if flushed {
            self.deferred.clear();
        }
        info!(flushed, "Store flushed");
        flushed
    }

    // == Save ==
    /// Writes an item with its current value and TTL.
    ///
    /// On success the item becomes a hit. A Store failure returns `false`
    /// and leaves the hit flag as it was.
    pub fn save(&self, item: &mut CacheItem) -> Result<bool> {
        Self::persist(&self.store, &self.keys, item)
    }

    fn persist(store: &S, keys: &KeySpace, item: &mut CacheItem) -> Result<bool> {
        let composed = keys.compose(item.key())?;
        let value = item.get().cloned().unwrap_or(Value::Null);

        match store.store(&composed, value, keys.clamp(item.ttl())) {
            Ok(()) => {
                item.mark_saved();
                Ok(true)
            }
            Err(err) => {
                warn!(key = %composed, error = %err, "Cache write failed");
                Ok(false)
            }
        }
    }

    // == Deferred Writes ==
    /// Queues an item for the next [`CacheItemPool::commit`]. Always succeeds.
    pub fn save_deferred(&mut self, item: CacheItem) -> bool {
        debug!(key = item.key(), "Deferred save queued");
        self.deferred.insert(item.key().to_string(), item);
        true
    }

    /// Saves every queued item, attempting all of them.
    ///
    /// An item with an invalid key counts as a failed save. Returns `true`
    /// only if every save succeeded. The buffer is empty afterwards.
    pub fn commit(&mut self) -> bool {
        self.commit_items().0
    }

    // == Commit Items ==
    /// Like [`CacheItemPool::commit`], also handing back the drained items.
    ///
    /// Saved items come back as hits; items whose save failed keep their
    /// prior hit flag.
    pub fn commit_items(&mut self) -> (bool, HashMap<String, CacheItem>) {
        let mut items = std::mem::take(&mut self.deferred);

        let mut all_saved = true;
        for item in items.values_mut() {
            let saved = match Self::persist(&self.store, &self.keys, item) {
                Ok(saved) => saved,
                Err(CacheError::InvalidKey(key)) => {
                    warn!(key = %key, "Skipping deferred item with invalid key");
                    false
                }
                Err(err) => {
                    warn!(error = %err, "Deferred save failed");
                    false
                }
            };
            all_saved &= saved;
        }

        debug!(items = items.len(), all_saved, "Deferred items committed");
        (all_saved, items)
    }

    /// Returns a queued item by its bare key.
    pub fn deferred(&self, key: &str) -> Option<&CacheItem> {
        self.deferred.get(key)
    }

    // == Deferred Length ==
    /// Returns the number of items waiting for the next commit.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Empties the deferred buffer, returning how many items were dropped.
    pub fn discard_deferred(&mut self) -> usize {
        let count = self.deferred.len();
        self.deferred.clear();
        count
    }
}
