//! Cache Module
//!
//! Provides a fixed-capacity in-memory cache with LRU eviction.
//!
//! The slot arena backing the cache stays crate-private:
//!
//! ```compile_fail
//! use mini_lru::cache::RecencyList;
//! ```

mod entry;
mod iter;
mod lru;
mod store;


// Re-export public types
pub use entry::Entry;
pub use iter::CacheIter;
pub(crate) use lru::{RecencyList, Slot};
pub use store::LruCache;

// == Public Constants ==
/// Upper bound on slots reserved when a cache is built; larger caches grow on demand
pub const MAX_PREALLOCATED_ENTRIES: usize = 1024;
