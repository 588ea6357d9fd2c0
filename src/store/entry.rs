//! Stored Entry Module
//!
//! Defines a document held by the in-memory store, with its expiry.

use chrono::Utc;
use serde_json::Value;

// == Stored Entry ==
/// A single document and the instant it stops being readable.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// The stored document
    pub value: Value,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl StoredEntry {
    // == Constructor ==
    /// Creates a new entry from a TTL in seconds.
    ///
    /// A TTL of `0` never expires. A negative TTL yields an entry that is
    /// already expired.
    pub fn new(value: Value, ttl_seconds: i64) -> Self {
        let expires_at = match ttl_seconds {
            0 => None,
            ttl => Some(current_timestamp_ms().saturating_add(ttl.saturating_mul(1000))),
        };

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires| current_timestamp_ms() >= expires)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
