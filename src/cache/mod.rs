//! Cache Module
//!
//! The two cache contracts (simple key-value and item pool) and the key and
//! TTL rules they share.

mod bulk;
mod item;
mod key;
mod pool;
mod simple;
mod ttl;


// Re-export public types
pub use bulk::{entries_from_json, keys_from_json};
pub use item::CacheItem;
pub use key::{validate_key, KeySpace};
pub use pool::CacheItemPool;
pub use simple::SimpleCache;
pub use ttl::{normalize_ttl, CalendarInterval, ParseIntervalError, Ttl};

// == Public Constants ==
/// Maximum allowed composed key length in bytes
pub const MAX_KEY_LENGTH: usize = 65;

/// Characters that may not appear in a composed key
pub const RESERVED_KEY_CHARS: &str = ":@{}()/\\";

/// Largest relative expiry a document store accepts before reading the value
/// as an absolute Unix timestamp (30 days)
pub const MAX_RELATIVE_TTL_SECS: i64 = 2_592_000;
