//! Docstore Cache - cache contracts backed by a document-store client
//!
//! Provides a simple get/set/delete cache and an item pool with deferred
//! writes, both translating into operations on a pluggable [`Store`].

pub mod cache;
pub mod config;
pub mod error;
pub mod store;

pub use cache::{CacheItem, CacheItemPool, CalendarInterval, SimpleCache, Ttl};
pub use config::Config;
pub use error::{CacheError, Result, StoreError};
pub use store::{MemoryStore, Store};
