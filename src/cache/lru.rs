//! Recency List Module
//!
//! Doubly linked list of entries ordered by recency, stored in a slot arena.

use crate::cache::Entry;

/// Index of a node inside the arena.
pub type Slot = usize;

#[derive(Debug)]
struct Node<K, V> {
    entry: Entry<K, V>,
    prev: Option<Slot>,
    next: Option<Slot>,
}

// == Recency List ==
/// Owns every cached entry, ordered by recency.
///
/// - Head = Most recently put
/// - Tail = Least recently put (next eviction candidate)
///
/// Links are slot indices, so relinking never aliases. Freed slots are kept
/// on a free list and reused by later pushes.
#[derive(Debug)]
pub struct RecencyList<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    free: Vec<Slot>,
    head: Option<Slot>,
    tail: Option<Slot>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an entry at the head and returns its slot.
    pub fn push_front(&mut self, entry: Entry<K, V>) -> Slot {
        let node = Node {
            entry,
            prev: None,
            next: self.head,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };

        match self.head {
            Some(old_head) => {
                if let Some(head) = self.nodes[old_head].as_mut() {
                    head.prev = Some(slot);
                }
            }
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
        self.len += 1;
        slot
    }

    // == Remove ==
    /// Unlinks the node at `slot` and returns its entry.
    ///
    /// Returns None if the slot is vacant.
    pub fn remove(&mut self, slot: Slot) -> Option<Entry<K, V>> {
        let node = self.nodes.get_mut(slot)?.take()?;

        match node.prev {
            Some(prev) => {
                if let Some(p) = self.nodes[prev].as_mut() {
                    p.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => {
                if let Some(n) = self.nodes[next].as_mut() {
                    n.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }

        self.free.push(slot);
        self.len -= 1;
        Some(node.entry)
    }

    // == Pop Back ==
    /// Removes and returns the least recent entry.
    pub fn pop_back(&mut self) -> Option<Entry<K, V>> {
        self.tail.and_then(|slot| self.remove(slot))
    }

    /// Slot of the most recent entry.
    pub fn head(&self) -> Option<Slot> {
        self.head
    }

    /// Slot of the least recent entry.
    #[allow(dead_code)]
    pub fn tail(&self) -> Option<Slot> {
        self.tail
    }

    /// Slot following `slot` toward the tail.
    pub fn next_of(&self, slot: Slot) -> Option<Slot> {
        self.node(slot).and_then(|node| node.next)
    }

    pub fn get(&self, slot: Slot) -> Option<&Entry<K, V>> {
        self.node(slot).map(|node| &node.entry)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every entry and resets the arena.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn node(&self, slot: Slot) -> Option<&Node<K, V>> {
        self.nodes.get(slot).and_then(Option::as_ref)
    }
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
