//! Store Module
//!
//! The document-store contract the cache facades are written against, plus an
//! in-memory implementation.

mod entry;
mod memory;

use std::sync::Arc;

use serde_json::Value;

use crate::error::StoreResult;

pub use entry::StoredEntry;
pub use memory::MemoryStore;

// == Store Trait ==
/// Physical operations a document store must provide.
///
/// Every call is a single synchronous request-response. Implementations must be
/// `Send + Sync` so one client can back several facades.
pub trait Store: Send + Sync {
    /// Reads a document. Fails with `NotFound` when absent.
    fn fetch(&self, key: &str) -> StoreResult<Value>;

    /// Upserts a document with an expiry in seconds.
    ///
    /// `0` means no expiry; a negative count means already expired.
    fn store(&self, key: &str, value: Value, ttl_seconds: i64) -> StoreResult<()>;

    /// Removes a document. Fails with `NotFound` when absent.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Reports whether a document exists.
    fn exists(&self, key: &str) -> bool;

    /// Wipes every document visible to this connection, regardless of namespace.
    fn flush_all(&self) -> bool;
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn fetch(&self, key: &str) -> StoreResult<Value> {
        (**self).fetch(key)
    }

    fn store(&self, key: &str, value: Value, ttl_seconds: i64) -> StoreResult<()> {
        (**self).store(key, value, ttl_seconds)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn exists(&self, key: &str) -> bool {
        (**self).exists(key)
    }

    fn flush_all(&self) -> bool {
        (**self).flush_all()
    }
}
