//! The dictionary's backing store: open addressing with two-choice
//! ("cuckoo") hashing.
//!
//! Every key has two candidate slots, one per independently-seeded hash
//! function. Inserting into a full pair of candidates runs a displacement
//! chain: evict one occupant, seat the new pair, re-home the evictee at its
//! alternate slot, and so on. A chain that fails to settle doubles the table
//! with fresh seeds. The seeds are randomized at creation and on every
//! rehash, which both defeats hash flooding and decorrelates the probe
//! sequences.

use crate::interpreter::hashing::{key_eq, Key};
use crate::interpreter::value::Value;

const MIN_TABLE_SIZE: usize = 4;
// When deleting, if the live/slot ratio falls below this we shrink.
const REHASH_RATIO: f64 = 0.25;

#[derive(Debug, Clone)]
struct Entry {
    key: Key,
    value: Value,
}

/// An associative array keyed by hashable values.
#[derive(Debug, Clone)]
pub struct HashTable {
    // Always a power of two; `size` is the live entry count.
    table_size: usize,
    size: usize,
    // Seeds for the two probe functions.
    seed1: u64,
    seed2: u64,
    // slots.len() == table_size
    slots: Vec<Option<Entry>>,
}

impl HashTable {
    pub fn new() -> Self {
        let mut table = Self {
            table_size: MIN_TABLE_SIZE / 2,
            size: 0,
            seed1: 0,
            seed2: 0,
            slots: Vec::new(),
        };
        // Sets the seeds and grows to the real minimum size.
        table.rehash(true);
        table
    }

    /// The number of live entries. Always equal to the count of occupied
    /// slots, never the slot capacity.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn slot1(&self, hash: u64) -> usize {
        ((hash ^ self.seed1) & (self.table_size as u64 - 1)) as usize
    }

    fn slot2(&self, hash: u64) -> usize {
        ((hash ^ self.seed2) & (self.table_size as u64 - 1)) as usize
    }

    fn matches(&self, idx: usize, key: &Key) -> bool {
        match &self.slots[idx] {
            Some(entry) => key_eq(entry.key.value(), key.value()),
            None => false,
        }
    }

    /// The slot currently holding an entry equal to `key`, if any.
    fn find(&self, key: &Key) -> Option<usize> {
        let idx = self.slot1(key.hash());
        if self.matches(idx, key) {
            return Some(idx);
        }
        let idx = self.slot2(key.hash());
        if self.matches(idx, key) {
            return Some(idx);
        }
        None
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.find(key)
            .and_then(|idx| self.slots[idx].as_ref())
            .map(|entry| &entry.value)
    }

    pub fn set(&mut self, key: Key, value: Value) {
        if let Some(idx) = self.find(&key) {
            if let Some(entry) = self.slots[idx].as_mut() {
                entry.value = value;
            }
            return;
        }
        let mut pending = Entry { key, value };
        // Displacement chain: seat the pending entry, re-home whatever it
        // evicted at that entry's alternate slot, alternating probe
        // functions.
        let max_tries = self.table_size / 2;
        for _ in 0..max_tries {
            let idx = self.slot1(pending.key.hash());
            pending = match self.slots[idx].replace(pending) {
                None => {
                    self.size += 1;
                    return;
                }
                Some(evicted) => evicted,
            };
            let idx = self.slot2(pending.key.hash());
            pending = match self.slots[idx].replace(pending) {
                None => {
                    self.size += 1;
                    return;
                }
                Some(evicted) => evicted,
            };
        }
        // The chain failed to settle: grow with fresh seeds, then seat the
        // leftover evictee.
        self.rehash(true);
        self.set(pending.key, pending.value);
    }

    pub fn delete(&mut self, key: &Key) -> bool {
        match self.find(key) {
            Some(idx) => {
                self.slots[idx] = None;
                self.size -= 1;
                if self.table_size > MIN_TABLE_SIZE
                    && (self.size as f64) / (self.table_size as f64) < REHASH_RATIO
                {
                    self.rehash(false);
                }
                true
            }
            None => false,
        }
    }

    /// Grow or shrink the table, reinserting every surviving entry. The
    /// seeds and table size change *before* reinsertion: a nested rehash
    /// triggered by a failing chain mid-reinsert therefore always restarts
    /// with fresh seeds and a larger table, which is what guarantees
    /// termination.
    fn rehash(&mut self, grow: bool) {
        self.size = 0;
        self.seed1 = rand::random();
        self.seed2 = rand::random();
        self.table_size = if grow {
            self.table_size * 2
        } else {
            self.table_size / 2
        };
        let old = std::mem::replace(&mut self.slots, vec![None; self.table_size]);
        for entry in old.into_iter().flatten() {
            self.set(entry.key, entry.value);
        }
    }

    /// Lazy traversal over live entries, in unspecified but
    /// stable-while-unmutated order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.slots
            .iter()
            .flatten()
            .map(|entry| (entry.key.value(), &entry.value))
    }

    /// Visitor-style traversal; the visitor returns false to stop early.
    pub fn for_each(&self, mut visitor: impl FnMut(&Value, &Value) -> bool) {
        for entry in self.slots.iter().flatten() {
            if !visitor(entry.key.value(), &entry.value) {
                break;
            }
        }
    }
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}
