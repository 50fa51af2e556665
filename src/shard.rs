use std::hash::BuildHasher;

use hashbrown::{hash_table::Entry, HashTable};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) type ShardReader<'a> = RwLockReadGuard<'a, Shard>;
pub(crate) type ShardWriter<'a> = RwLockWriteGuard<'a, Shard>;

/// A shard (bucket) of a [`crate::ShardSet`]. Each shard holds a [`hashbrown::HashTable`] of
/// unique items; its length is the table's length, so the count can never drift from the
/// contents.
///
/// Items are looked up by a hash computed once by the owning set, the same hash that picked
/// the shard. A shard has no lock of its own: the concurrent set wraps it in a [`LockedShard`],
/// the local set owns one directly.
#[derive(Clone, Default)]
pub(crate) struct Shard {
    items: HashTable<String>,
}

impl Shard {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: HashTable::with_capacity(capacity),
        }
    }

    /// Inserts `item` unless it is already present. Returns `true` if it was inserted.
    pub fn insert<T, S>(&mut self, hash: u64, item: T, hasher: &S) -> bool
    where
        T: AsRef<str> + Into<String>,
        S: BuildHasher,
    {
        match self.items.entry(
            hash,
            |s| s.as_str() == item.as_ref(),
            |s| hasher.hash_one(s.as_str()),
        ) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(item.into());
                true
            }
        }
    }

    /// Removes `item`. Returns `true` if it was present.
    pub fn remove(&mut self, hash: u64, item: &str) -> bool {
        match self.items.find_entry(hash, |s| s == item) {
            Ok(entry) => {
                entry.remove();
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, hash: u64, item: &str) -> bool {
        self.items.find(hash, |s| s == item).is_some()
    }

    /// Inserts every item of `items`. Returns the number of new insertions, which is also the
    /// growth of the shard.
    pub fn add<I, T, S>(&mut self, items: I, hasher: &S) -> usize
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str> + Into<String>,
        S: BuildHasher,
    {
        let before = self.len();
        for item in items {
            let hash = hasher.hash_one(item.as_ref());
            self.insert(hash, item, hasher);
        }
        self.len() - before
    }

    /// Removes every item of `items`. Absent and repeated items are no-ops; the result is the net
    /// shrink of the shard.
    pub fn remove_all<I, T, S>(&mut self, items: I, hasher: &S) -> usize
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
        S: BuildHasher,
    {
        let before = self.len();
        for item in items {
            let item = item.as_ref();
            self.remove(hasher.hash_one(item), item);
        }
        before - self.len()
    }

    /// Removes and returns an arbitrary item.
    ///
    /// The table keeps no cursor, so every call scans control bytes from the first group up to
    /// the first occupied slot. Slots freed by earlier pops stay in front of that scan: draining
    /// a shard of `n` items one pop at a time reads on the order of `n * capacity / 16` groups.
    /// Use [`Shard::clear`] to empty a shard without looking at its items.
    pub fn pop(&mut self) -> Option<String> {
        self.items.extract_if(|_| true).next()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Calls `f` on every item until it returns `false`. Returns `false` if the walk was stopped.
    pub fn each<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&str) -> bool,
    {
        self.items.iter().all(|s| f(s.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn list(&self) -> Vec<String> {
        self.items.iter().cloned().collect()
    }
}

/// A [`Shard`] behind its own read/write lock.
pub(crate) struct LockedShard {
    data: RwLock<Shard>,
}

impl LockedShard {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: RwLock::new(Shard::with_capacity(capacity)),
        }
    }

    pub fn read(&self) -> ShardReader<'_> {
        self.data.read()
    }

    pub fn write(&self) -> ShardWriter<'_> {
        self.data.write()
    }
}
