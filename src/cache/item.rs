//! Cache Item Module
//!
//! One cache slot as handed out and accepted by the item pool.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::cache::Ttl;

// == Cache Item ==
/// A key, its value, whether that value came from a confirmed Store round
/// trip, and the TTL to write it with.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheItem {
    key: String,
    value: Option<Value>,
    hit: bool,
    ttl: i64,
}

impl CacheItem {
    /// Creates a bare item: no value, not a hit, no expiry.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            hit: false,
            ttl: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value, if one was fetched or set.
    pub fn get(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Value> {
        self.value
    }

    /// True only after a successful fetch or save.
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Seconds handed to the Store on save, `0` meaning no expiry.
    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    pub fn set(&mut self, value: Value) -> &mut Self {
        self.value = Some(value);
        self
    }

    // == Expiry ==
    /// Expires the item at an absolute instant, or never when `None`.
    ///
    /// The remaining seconds are computed now, not at save time.
    pub fn expires_at(&mut self, expiration: Option<DateTime<Utc>>) -> &mut Self {
        self.ttl = Ttl::from(expiration).normalize();
        self
    }

    /// Expires the item after a relative TTL.
    pub fn expires_after(&mut self, ttl: impl Into<Ttl>) -> &mut Self {
        self.ttl = ttl.into().normalize();
        self
    }

    // == Pool Transitions ==
    /// Records a successful fetch.
    pub(crate) fn mark_hit(&mut self, value: Value) {
        self.value = Some(value);
        self.hit = true;
    }

    /// Records a successful save of the current value.
    pub(crate) fn mark_saved(&mut self) {
        self.hit = true;
    }
}
