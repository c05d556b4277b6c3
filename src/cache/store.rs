//! Cache Store Module
//!
//! Main cache engine combining a key index with the recency list under one lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::{RecencyList, Slot};
use crate::cache::{CacheIter, Entry, MAX_PREALLOCATED_ENTRIES};
use crate::config::CacheConfig;

/// State guarded by the cache lock.
///
/// Every key in `index` maps to exactly one live slot in `list` and every
/// node in `list` is indexed by its key.
#[derive(Debug)]
pub(crate) struct Inner<K, V> {
    pub(crate) index: HashMap<K, Slot>,
    pub(crate) list: RecencyList<K, V>,
}

// == LRU Cache ==
/// Fixed-capacity key/value cache with least-recently-put eviction.
///
/// `get`, `put`, `delete` and `clear` take the cache lock for their whole
/// duration. An open [`CacheIter`] holds the same lock until it is closed or
/// dropped, so any of those calls made while an iterator is alive will block,
/// including calls from the thread that owns the iterator. Close iterators
/// promptly, or use [`LruCache::with_iter`].
///
/// Share between threads with `Arc<LruCache<K, V>>`.
pub struct LruCache<K, V> {
    inner: Mutex<Inner<K, V>>,
    max_size: u32,
    /// Mirror of `list.len()`, written only while the lock is held.
    cur_size: AtomicU32,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `max_size` entries.
    ///
    /// A `max_size` of 0 yields a cache that stores nothing. Storage grows
    /// with use; at most `MAX_PREALLOCATED_ENTRIES` slots are reserved upfront.
    pub fn new(max_size: u32) -> Self {
        let capacity = (max_size as usize).min(MAX_PREALLOCATED_ENTRIES);
        Self {
            inner: Mutex::new(Inner {
                index: HashMap::with_capacity(capacity),
                list: RecencyList::with_capacity(capacity),
            }),
            max_size,
            cur_size: AtomicU32::new(0),
        }
    }

    /// Creates a cache from a loaded configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_size)
    }

    // == Get ==
    /// Returns a copy of the value stored under `key`.
    ///
    /// Lookups do not count as a use: the entry keeps its recency position.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.max_size == 0 {
            return None;
        }
        let inner = self.inner.lock();
        let slot = *inner.index.get(key)?;
        inner.list.get(slot).map(|entry| entry.value().clone())
    }

    /// Checks whether `key` is cached, without touching recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.max_size == 0 {
            return false;
        }
        self.inner.lock().index.contains_key(key)
    }

    // == Put ==
    /// Stores `value` under `key` as the most recent entry.
    ///
    /// When the cache is full the least recent entry is evicted first, before
    /// checking whether `key` is already cached. Re-putting a cached key into
    /// a full cache therefore still evicts the tail, which may be another key.
    /// The previous entry for `key`, if it survived, is then replaced.
    pub fn put(&self, key: K, value: V) {
        if self.max_size == 0 {
            trace!("put ignored, cache has zero capacity");
            return;
        }
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if inner.list.len() >= self.max_size as usize {
            if let Some(evicted) = inner.list.pop_back() {
                inner.index.remove(evicted.key());
                debug!(max_size = self.max_size, "evicted least recent entry");
            }
        }

        if let Some(stale) = inner.index.remove(&key) {
            inner.list.remove(stale);
        }

        let slot = inner.list.push_front(Entry::new(key.clone(), value));
        inner.index.insert(key, slot);
        self.sync_size(inner);
        trace!(size = inner.list.len(), "put entry");
    }

    // == Delete ==
    /// Removes the entry for `key`. Missing keys are ignored.
    pub fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if let Some(slot) = inner.index.remove(key) {
            inner.list.remove(slot);
            self.sync_size(inner);
            trace!(size = inner.list.len(), "deleted entry");
        }
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&self) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        inner.index.clear();
        inner.list.clear();
        self.sync_size(inner);
        debug!("cache cleared");
    }

    // == Iterator ==
    /// Opens a traversal from most recent to least recent entry.
    ///
    /// The returned iterator holds the cache lock until it is closed or
    /// dropped. Every other cache call blocks in the meantime, except
    /// [`LruCache::size`].
    pub fn iterator(&self) -> CacheIter<'_, K, V> {
        CacheIter::new(self.inner.lock())
    }

    /// Runs `f` over an open iterator and releases the lock afterwards,
    /// including when `f` panics.
    pub fn with_iter<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut CacheIter<'_, K, V>) -> R,
    {
        let mut iter = self.iterator();
        let result = f(&mut iter);
        iter.close();
        result
    }

    fn sync_size(&self, inner: &Inner<K, V>) {
        self.cur_size
            .store(inner.list.len() as u32, Ordering::Relaxed);
    }
}

impl<K, V> LruCache<K, V> {
    // == Size ==
    /// Returns the number of cached entries.
    ///
    /// Reads a relaxed counter without taking the lock, so it never blocks
    /// (not even behind an open iterator) and may briefly lag a concurrent
    /// `put` or `delete`.
    pub fn size(&self) -> u32 {
        self.cur_size.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Capacity fixed at construction.
    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_size", &self.max_size)
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    /// Asserts the index and list describe the same set of entries.
    fn assert_consistent<K, V>(cache: &LruCache<K, V>)
    where
        K: Hash + Eq + Clone + std::fmt::Debug,
        V: Clone,
    {
        let inner = cache.inner.lock();
        assert_eq!(inner.index.len(), inner.list.len());
        assert_eq!(cache.size() as usize, inner.list.len());
        assert!(inner.list.len() <= cache.max_size() as usize);

        let mut cursor = inner.list.head();
        let mut walked = 0;
        while let Some(slot) = cursor {
            let entry = inner.list.get(slot).unwrap();
            assert_eq!(inner.index.get(entry.key()), Some(&slot));
            walked += 1;
            cursor = inner.list.next_of(slot);
        }
        assert_eq!(walked, inner.list.len());
    }

    #[test]
    fn test_cache_new() {
        let cache: LruCache<String, i32> = LruCache::new(100);
        assert_eq!(cache.size(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.max_size(), 100);
    }

    #[test]
    fn test_put_and_get() {
        let cache = LruCache::new(100);

        cache.put("tom".to_string(), 123);
        assert_eq!(cache.get("tom"), Some(123));
        assert_eq!(cache.size(), 1);

        cache.delete("tom");
        assert_eq!(cache.size(), 0);
        assert_eq!(cache.get("tom"), None);
    }

    #[test]
    fn test_get_nonexistent() {
        let cache: LruCache<&str, i32> = LruCache::new(4);
        assert_eq!(cache.get("missing"), None);
        assert!(!cache.contains("missing"));
    }

    #[test]
    fn test_eviction_order() {
        let cache = LruCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.size(), 2);
        assert_consistent(&cache);
    }

    #[test]
    fn test_get_does_not_refresh_recency() {
        let cache = LruCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);

        // A lookup is not a use, so "a" stays the eviction candidate.
        assert_eq!(cache.get("a"), Some(1));
        cache.put("c", 3);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn test_reput_refreshes_value_and_recency() {
        let cache = LruCache::new(3);
        cache.put("k", 1);
        cache.put("x", 2);
        cache.put("y", 3);

        // Full: evicts the tail, which is the old "k" itself.
        cache.put("k", 10);
        cache.put("z", 4);

        assert_eq!(cache.get("k"), Some(10));
        assert_eq!(cache.get("x"), None);
        assert_eq!(cache.size(), 3);
        assert_consistent(&cache);
    }

    #[test]
    fn test_reput_when_full_evicts_unrelated_tail() {
        let cache = LruCache::new(3);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);

        // "c" exists, yet the full cache still evicts "a" before replacing "c".
        cache.put("c", 30);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(30));
        assert_eq!(cache.size(), 2);
        assert_consistent(&cache);
    }

    #[test]
    fn test_reput_below_capacity_keeps_one_entry() {
        let cache = LruCache::new(5);
        cache.put("a", 1);
        cache.put("a", 2);
        cache.put("a", 3);

        assert_eq!(cache.size(), 1);
        assert_eq!(cache.get("a"), Some(3));
        assert_consistent(&cache);
    }

    #[test]
    fn test_delete_nonexistent_is_noop() {
        let cache = LruCache::new(3);
        cache.put("a", 1);

        cache.delete("missing");
        assert_eq!(cache.size(), 1);

        cache.delete("a");
        cache.delete("a");
        assert_eq!(cache.size(), 0);
        assert_consistent(&cache);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = LruCache::new(0);
        cache.put("a", 1);
        cache.put("b", 2);

        assert_eq!(cache.size(), 0);
        assert_eq!(cache.get("a"), None);
        assert!(!cache.contains("a"));
        cache.delete("a");
        assert_consistent(&cache);
    }

    #[test]
    fn test_capacity_one() {
        let cache = LruCache::new(1);
        cache.put("a", 1);
        cache.put("b", 2);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));

        cache.put("b", 3);
        assert_eq!(cache.get("b"), Some(3));
        assert_eq!(cache.size(), 1);
        assert_consistent(&cache);
    }

    #[test]
    fn test_clear() {
        let cache = LruCache::new(3);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);

        cache.put("c", 3);
        assert_eq!(cache.get("c"), Some(3));
        assert_consistent(&cache);
    }

    #[test]
    fn test_returned_values_are_copies() {
        let cache = LruCache::new(2);
        cache.put("v", vec![1, 2, 3]);

        let mut copy = cache.get("v").unwrap();
        copy.push(4);

        assert_eq!(cache.get("v"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_huge_capacity_is_allocated_lazily() {
        let cache: LruCache<u64, u64> = LruCache::new(u32::MAX);
        assert_eq!(cache.max_size(), u32::MAX);

        cache.put(1, 1);
        assert_eq!(cache.get(&1), Some(1));
        assert_eq!(cache.size(), 1);
        assert_consistent(&cache);
    }

    #[test]
    fn test_debug_does_not_lock() {
        let cache = LruCache::new(4);
        cache.put("a", 1);

        // Formatting must not block behind an open iterator.
        let iter = cache.iterator();
        let printed = format!("{:?}", cache);
        iter.close();

        assert!(printed.contains("max_size: 4"));
        assert!(printed.contains("size: 1"));
    }

    #[test]
    fn test_from_config() {
        let cache: LruCache<u64, u64> = LruCache::from_config(&CacheConfig::new(7));
        assert_eq!(cache.max_size(), 7);
    }
}
