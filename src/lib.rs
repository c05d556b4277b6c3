//! Mini LRU - A fixed-capacity in-process key/value cache
//!
//! Entries are ordered by when they were put; once the cache is full every
//! new `put` evicts the least recently put entry. Lookups do not change the
//! order.
//!
//! ```
//! use mini_lru::LruCache;
//!
//! let cache = LruCache::new(2);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.put("c", 3);
//!
//! assert_eq!(cache.get("a"), None);
//! assert_eq!(cache.get("b"), Some(2));
//! assert_eq!(cache.get("c"), Some(3));
//! assert_eq!(cache.size(), 2);
//! ```
//!
//! # Iteration blocks the cache
//! [`LruCache::iterator`] keeps the cache locked until the iterator is closed
//! or dropped. Calling `get`, `put` or `delete` on the same cache while an
//! iterator is alive blocks, and deadlocks when done from the same thread.
//! Prefer [`LruCache::with_iter`], which always releases the lock.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheIter, Entry, LruCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
