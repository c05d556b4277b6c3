//! Cache Entry Module
//!
//! Defines the immutable key/value record stored in the cache.

use chrono::{DateTime, Utc};

// == Entry ==
/// A stored key/value pair plus the moment it was put.
///
/// Entries are never updated in place. Putting an existing key builds a new
/// entry with a fresh timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    key: K,
    value: V,
    created_at: DateTime<Utc>,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(key: K, value: V) -> Self {
        Self::with_timestamp(key, value, Utc::now())
    }

    /// Creates an entry with an explicit creation time.
    pub fn with_timestamp(key: K, value: V, created_at: DateTime<Utc>) -> Self {
        Self {
            key,
            value,
            created_at,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// When the entry was put into the cache.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Splits the entry into key and value.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}
