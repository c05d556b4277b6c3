//! Cache Iterator Module
//!
//! Ordered traversal of the cache while holding its lock.

use std::iter::FusedIterator;

use chrono::{DateTime, Utc};
use parking_lot::MutexGuard;
use tracing::debug;

use crate::cache::Slot;
use crate::cache::store::Inner;
use crate::cache::Entry;
use crate::error::{CacheError, Result};

/// Position of the iterator within the recency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// Nothing yielded yet; the next entry is the list head.
    NotStarted,
    /// The next entry lives in this slot.
    At(Slot),
    /// Past the tail.
    Done,
}

// == Cache Iterator ==
/// Walks the cache from most recent to least recent entry.
///
/// Holds the cache lock for its whole lifetime, so the view never changes
/// while iterating. The lock is released by [`CacheIter::close`] or when the
/// iterator is dropped. Entries are yielded as clones.
pub struct CacheIter<'a, K, V> {
    guard: MutexGuard<'a, Inner<K, V>>,
    cursor: Cursor,
    created_at: DateTime<Utc>,
}

impl<'a, K, V> CacheIter<'a, K, V> {
    pub(crate) fn new(guard: MutexGuard<'a, Inner<K, V>>) -> Self {
        debug!(entries = guard.list.len(), "cache iterator opened");
        Self {
            guard,
            cursor: Cursor::NotStarted,
            created_at: Utc::now(),
        }
    }

    /// Returns true while an entry remains to be yielded.
    pub fn has_next(&self) -> bool {
        self.pending().is_some()
    }

    /// When the iterator was opened.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Releases the cache lock.
    ///
    /// Consuming `self` makes a second close impossible; dropping the
    /// iterator has the same effect.
    pub fn close(self) {}

    fn pending(&self) -> Option<Slot> {
        match self.cursor {
            Cursor::NotStarted => self.guard.list.head(),
            Cursor::At(slot) => Some(slot),
            Cursor::Done => None,
        }
    }
}

impl<K: Clone, V: Clone> CacheIter<'_, K, V> {
    /// Returns the entry at the cursor and advances toward the tail.
    ///
    /// # Errors
    /// [`CacheError::IteratorExhausted`] when [`CacheIter::has_next`] is false.
    pub fn next_entry(&mut self) -> Result<Entry<K, V>> {
        let slot = self.pending().ok_or(CacheError::IteratorExhausted)?;
        let list = &self.guard.list;
        let entry = list.get(slot).cloned().ok_or(CacheError::IteratorExhausted)?;
        let next = list.next_of(slot);

        self.cursor = match next {
            Some(next) => Cursor::At(next),
            None => Cursor::Done,
        };
        Ok(entry)
    }
}

impl<K: Clone, V: Clone> Iterator for CacheIter<'_, K, V> {
    type Item = Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().ok()
    }
}

impl<K: Clone, V: Clone> FusedIterator for CacheIter<'_, K, V> {}

impl<K, V> Drop for CacheIter<'_, K, V> {
    fn drop(&mut self) {
        debug!("cache iterator closed");
    }
}
