//! Error types for the cache adapters
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Store Error Enum ==
/// Failure reported by a [`Store`](crate::store::Store) operation.
///
/// `NotFound` is an expected data-availability signal; `Fault` covers
/// transport and server failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Document does not exist
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Transport or server failure
    #[error("Store failure: {0}")]
    Fault(String),
}

// == Cache Error Enum ==
/// Unified error type for both cache facades.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Composed (namespaced) key violates the key rules
    #[error("Invalid key \"{0}\" provided")]
    InvalidKey(String),

    /// Bulk operation received something other than the expected collection
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Store failure surfaced to the caller
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == Result Type Alias ==
/// Convenience Result type for the cache adapters.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result type returned by [`Store`](crate::store::Store) implementations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
