//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Regular cache operations never fail: a miss is `None`, deleting a missing
/// key is a no-op and a full cache evicts. Only iterator misuse and bad
/// configuration surface here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// `next_entry` was called after the iterator ran out of entries
    #[error("called next with no remaining items")]
    IteratorExhausted,

    /// Configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
