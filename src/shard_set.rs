//! A concurrent set of strings using a sharding strategy.
//!
//! # Examples
//! ```
//! use shardset::ShardSet;
//!
//! let set = ShardSet::from(["foo", "bar"]);
//! set.insert("baz");
//!
//! assert_eq!(set.len(), 3);
//! assert!(set.has(["foo", "baz"]));
//! assert!(!set.contains("qux"));
//!
//! assert!(set.remove_one("foo"));
//! assert_eq!(set.len(), 2);
//! ```
use std::{
    fmt,
    hash::BuildHasher,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crossbeam_utils::CachePadded;

use crate::{
    error::{Error, Result},
    iter::Iter,
    shard::{LockedShard, Shard, ShardWriter},
    DefaultHashBuilder,
};

/// Number of shards used by [`ShardSet::new`] and the other constructors that don't take a shard
/// count.
pub const DEFAULT_SHARDS: usize = 64;

struct Inner<S> {
    shards: Box<[CachePadded<LockedShard>]>,
    length: AtomicUsize,
    hasher: S,
}

impl<S> std::ops::Deref for Inner<S> {
    type Target = Box<[CachePadded<LockedShard>]>;

    fn deref(&self) -> &Self::Target {
        &self.shards
    }
}

#[derive(Clone, Copy)]
enum Delta {
    Grow,
    Shrink,
}

/// A concurrent set of strings using a sharding strategy.
///
/// Items are spread over a fixed number of shards, each behind its own read/write lock, so
/// operations on items of different shards never contend. The total length is tracked by a
/// single atomic counter that is updated while the shard whose contents changed is still locked.
///
/// Operations touching several items (`add`, `remove`, `has`, ...) lock one shard at a time and
/// are not atomic as a whole: a concurrent reader may observe some of the items and not others.
/// No operation ever holds more than one shard lock.
///
/// Cloning a `ShardSet` gives another handle to the *same* set. Use [`ShardSet::copy`] for an
/// independent copy.
///
/// # Examples
/// ```
/// use shardset::ShardSet;
/// use std::thread;
///
/// let set = ShardSet::new();
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let set = set.clone();
///         thread::spawn(move || {
///             for i in 0..100 {
///                 set.insert(format!("{t}-{i}"));
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(set.len(), 400);
/// ```
pub struct ShardSet<S = DefaultHashBuilder> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for ShardSet<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ShardSet<DefaultHashBuilder> {
    /// Creates a new `ShardSet` with [`DEFAULT_SHARDS`] shards and the default hasher.
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    /// Creates a new `ShardSet` with the default hasher and `shards` shards.
    ///
    /// # Panics
    /// Panics if `shards` is zero. See [`ShardSet::try_with_shards`].
    pub fn with_shards(shards: usize) -> Self {
        Self::with_shards_and_hasher(shards, DefaultHashBuilder::default())
    }

    /// Creates a new `ShardSet` with the default hasher and `shards` shards, or an error if
    /// `shards` is zero.
    pub fn try_with_shards(shards: usize) -> Result<Self> {
        if shards == 0 {
            tracing::warn!(shards, "rejected shard count");
            return Err(Error::InvalidShardCount(shards));
        }
        Ok(Self::with_shards(shards))
    }

    /// Creates a new `ShardSet` with the default hasher and space for at least `cap` items.
    pub fn with_capacity(cap: usize) -> Self {
        Self::with_shards_and_capacity(DEFAULT_SHARDS, cap)
    }

    /// Creates a new `ShardSet` with the default hasher, `shards` shards, and space for at least
    /// `cap` items.
    pub fn with_shards_and_capacity(shards: usize, cap: usize) -> Self {
        Self::with_shards_and_capacity_and_hasher(shards, cap, DefaultHashBuilder::default())
    }
}

impl Default for ShardSet<DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ShardSet<S> {
    #[inline]
    pub(crate) fn shard_by_idx(&self, idx: usize) -> &LockedShard {
        &self.inner.shards[idx]
    }

    /// Returns the number of shards. Fixed for the lifetime of the set.
    #[inline]
    pub fn num_shards(&self) -> usize {
        self.inner.len()
    }

    /// Returns the number of items in the set.
    ///
    /// This is a single atomic read. While other threads are mutating the set, the value may
    /// reflect a multi-item `add` or `remove` that is only partially applied.
    pub fn len(&self) -> usize {
        self.inner.length.load(Ordering::Relaxed)
    }

    /// Returns `true` if the set is empty.
    ///
    /// This is equivalent to `set.len() == 0`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the items of the set.
    ///
    /// The iterator copies out one shard at a time and holds no lock between calls to `next`, so
    /// it sees each shard as it was when the iterator reached it.
    pub fn iter(&self) -> Iter<S> {
        Iter::new(self.clone())
    }

    /// Calls `f` on every item until it returns `false`.
    ///
    /// Like [`ShardSet::iter`], the walk has no snapshot isolation across shards, and `f` runs
    /// with no lock held, so it may freely use this set.
    pub fn each<F>(&self, mut f: F)
    where
        F: FnMut(&str) -> bool,
    {
        for item in self.iter() {
            if !f(&item) {
                break;
            }
        }
    }

    /// Returns all items of the set, in no particular order.
    pub fn list(&self) -> Vec<String> {
        let mut list = Vec::with_capacity(self.len());
        for shard in self.inner.iter() {
            list.extend(shard.read().iter().map(str::to_owned));
        }
        list
    }

    /// Removes all items from the set.
    ///
    /// Each shard is swapped for an empty one under its write lock.
    pub fn clear(&self) {
        let mut cleared = 0;
        for shard in self.inner.iter() {
            let mut writer = shard.write();
            let old = std::mem::take(&mut *writer);
            self.inner.length.fetch_sub(old.len(), Ordering::Relaxed);
            cleared += old.len();
        }
        tracing::debug!(cleared, "cleared set");
    }

    /// Removes and returns an arbitrary item, or `None` if the set is empty.
    ///
    /// Shards are scanned in index order. If a concurrent removal empties a shard between the
    /// scan and the pop, the scan moves on; `None` is returned only if no shard held an item.
    pub fn pop(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        for shard in self.inner.iter() {
            if shard.read().is_empty() {
                continue;
            }

            let mut writer = shard.write();
            if let Some(item) = writer.pop() {
                self.inner.length.fetch_sub(1, Ordering::Relaxed);
                return Some(item);
            }
            tracing::trace!("pop lost a race for a shard, moving on");
        }

        None
    }
}

impl<S: BuildHasher> ShardSet<S> {
    /// Creates a new `ShardSet` with the provided hasher `S`.
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_shards_and_hasher(DEFAULT_SHARDS, hasher)
    }

    /// Creates a new `ShardSet` with the provided hasher `S` and `shards` shards.
    ///
    /// # Panics
    /// Panics if `shards` is zero.
    pub fn with_shards_and_hasher(shards: usize, hasher: S) -> Self {
        Self::with_shards_and_capacity_and_hasher(shards, 0, hasher)
    }

    /// Creates a new `ShardSet` with the provided hasher `S`, `shards` shards, and space for at
    /// least `cap` items.
    ///
    /// # Panics
    /// Panics if `shards` is zero.
    pub fn with_shards_and_capacity_and_hasher(shards: usize, cap: usize, hasher: S) -> Self {
        assert!(shards > 0, "a ShardSet needs at least one shard");

        let shard_capacity = cap.div_ceil(shards);

        let shards = std::iter::repeat_with(|| {
            CachePadded::new(LockedShard::with_capacity(shard_capacity))
        })
        .take(shards)
        .collect();

        Self {
            inner: Arc::new(Inner {
                shards,
                length: AtomicUsize::new(0),
                hasher,
            }),
        }
    }

    fn hash_u64(&self, item: &str) -> u64 {
        self.inner.hasher.hash_one(item)
    }

    /// Returns `true` if `self` and `other` put every item in the same shard index.
    ///
    /// A zero-sized hasher builder (the default [`crate::DefaultHashBuilder`] among them) has no
    /// per-instance seed, so two sets built with it hash alike. Any hasher carrying state may
    /// differ between instances and is never assumed to match.
    fn same_layout(&self, other: &ShardSet<S>) -> bool {
        self.num_shards() == other.num_shards() && std::mem::size_of::<S>() == 0
    }

    #[inline]
    fn shard_for_hash(&self, hash: u64) -> usize {
        crate::hash::index_for_hash(hash, self.num_shards())
    }

    #[inline]
    fn shard(&self, item: &str) -> (&LockedShard, u64) {
        let hash = self.hash_u64(item);
        (self.shard_by_idx(self.shard_for_hash(hash)), hash)
    }

    /// Returns the index of the shard `item` belongs to.
    pub fn shard_index(&self, item: &str) -> usize {
        self.shard_for_hash(self.hash_u64(item))
    }

    fn fold(&self, delta: Delta, changed: usize) {
        match delta {
            Delta::Grow => self.inner.length.fetch_add(changed, Ordering::Relaxed),
            Delta::Shrink => self.inner.length.fetch_sub(changed, Ordering::Relaxed),
        };
    }

    /// Runs `op` on each item under the write lock of its shard. Consecutive items of the same
    /// shard share one lock acquisition; the shard's delta is folded into the length before its
    /// lock is released.
    fn apply<I, T, F>(&self, items: I, delta: Delta, mut op: F) -> usize
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
        F: FnMut(&mut Shard, u64, T) -> bool,
    {
        let mut total = 0;
        let mut held: Option<(usize, ShardWriter<'_>, usize)> = None;

        for item in items {
            let hash = self.hash_u64(item.as_ref());
            let idx = self.shard_for_hash(hash);

            if !matches!(held, Some((h, _, _)) if h == idx) {
                if let Some((_, writer, changed)) = held.take() {
                    self.fold(delta, changed);
                    total += changed;
                    drop(writer);
                }
                held = Some((idx, self.shard_by_idx(idx).write(), 0));
            }

            if let Some((_, writer, changed)) = held.as_mut() {
                if op(&mut **writer, hash, item) {
                    *changed += 1;
                }
            }
        }

        if let Some((_, writer, changed)) = held.take() {
            self.fold(delta, changed);
            total += changed;
            drop(writer);
        }

        total
    }

    /// Inserts an item into the set. Returns `true` if it was not already present.
    ///
    /// # Example
    /// ```
    /// use shardset::ShardSet;
    ///
    /// let set = ShardSet::new();
    /// assert!(set.insert("foo"));
    /// assert!(!set.insert("foo"));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert<T>(&self, item: T) -> bool
    where
        T: AsRef<str> + Into<String>,
    {
        self.add([item]) == 1
    }

    /// Inserts every item of `items`. Items already present, and repeats within `items`, are
    /// skipped. Returns the number of items actually inserted.
    ///
    /// # Example
    /// ```
    /// use shardset::ShardSet;
    ///
    /// let set = ShardSet::new();
    /// assert_eq!(set.add(["a", "b", "a"]), 2);
    /// assert_eq!(set.add(["b", "c"]), 1);
    /// assert_eq!(set.len(), 3);
    /// ```
    pub fn add<I, T>(&self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str> + Into<String>,
    {
        let hasher = &self.inner.hasher;
        self.apply(items, Delta::Grow, |shard, hash, item| {
            shard.insert(hash, item, hasher)
        })
    }

    /// Removes an item from the set. Returns `true` if it was present.
    pub fn remove_one(&self, item: &str) -> bool {
        self.remove([item]) == 1
    }

    /// Removes every item of `items`. Absent items are skipped. Returns the number of items
    /// actually removed.
    ///
    /// # Example
    /// ```
    /// use shardset::ShardSet;
    ///
    /// let set = ShardSet::from(["a", "b", "c"]);
    /// assert_eq!(set.remove(["a", "a", "x"]), 1);
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn remove<I, T>(&self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.apply(items, Delta::Shrink, |shard, hash, item| {
            shard.remove(hash, item.as_ref())
        })
    }

    /// Returns `true` if the set contains `item`.
    pub fn contains(&self, item: &str) -> bool {
        let (shard, hash) = self.shard(item);
        shard.read().contains(hash, item)
    }

    /// Returns `true` if the set contains every item of `items`. Returns `false` if `items` is
    /// empty or the set is empty.
    ///
    /// Each item is checked under its own shard's read lock; the check stops at the first miss.
    ///
    /// # Example
    /// ```
    /// use shardset::ShardSet;
    ///
    /// let set = ShardSet::from(["a", "b"]);
    /// assert!(set.has(["a", "b"]));
    /// assert!(!set.has(["a", "c"]));
    /// assert!(!set.has(Vec::<&str>::new()));
    /// ```
    pub fn has<I, T>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        if self.is_empty() {
            return false;
        }

        let mut items = items.into_iter().peekable();
        if items.peek().is_none() {
            return false;
        }

        items.all(|item| self.contains(item.as_ref()))
    }

    /// Returns `true` if both sets hold the same items.
    ///
    /// When both sets are known to place every item in the same shard, shards are compared index
    /// by index. Otherwise (different shard counts, or a hasher with per-instance state such as
    /// [`std::hash::RandomState`]) each item of `self` is looked up in `other`. Only one shard
    /// lock is held at a time; if either set is mutated during the call, the answer may not hold
    /// for any single instant.
    pub fn is_equal(&self, other: &ShardSet<S>) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }

        if self.len() != other.len() {
            return false;
        }

        if !self.same_layout(other) {
            return other.is_subset(self);
        }

        for idx in 0..self.num_shards() {
            let mine = self.shard_by_idx(idx).read().len();
            let theirs = other.shard_by_idx(idx).read().len();
            if mine != theirs {
                return false;
            }
        }

        for idx in 0..self.num_shards() {
            let items = self.shard_by_idx(idx).read().list();
            let theirs = other.shard_by_idx(idx).read();
            if !items
                .iter()
                .all(|item| theirs.contains(other.hash_u64(item), item))
            {
                return false;
            }
        }

        true
    }

    /// Returns `true` if every item of `other` is in `self`, i.e. `other` is a subset of `self`.
    /// An empty `other` is a subset of every set, including an empty one.
    ///
    /// # Example
    /// ```
    /// use shardset::ShardSet;
    ///
    /// let big = ShardSet::from(["a", "b", "c"]);
    /// let small = ShardSet::from(["a", "b"]);
    /// assert!(big.is_subset(&small));
    /// assert!(!small.is_subset(&big));
    /// ```
    pub fn is_subset(&self, other: &ShardSet<S>) -> bool {
        if other.len() > self.len() {
            return false;
        }

        let mut subset = true;
        other.each(|item| {
            subset = self.contains(item);
            subset
        });
        subset
    }

    /// Returns `true` if every item of `self` is in `other`. Equivalent to
    /// `other.is_subset(self)`.
    pub fn is_superset(&self, other: &ShardSet<S>) -> bool {
        other.is_subset(self)
    }

    /// Adds every item of `other` to `self`, one shard of `other` at a time.
    pub fn merge(&self, other: &ShardSet<S>) {
        for idx in 0..other.num_shards() {
            let items = other.shard_by_idx(idx).read().list();
            self.add(items);
        }
    }

    /// Removes every item of `other` from `self`, one shard of `other` at a time.
    ///
    /// This is not the inverse of [`ShardSet::merge`]: items `self` held before a merge are
    /// removed too if `other` has them.
    pub fn separate(&self, other: &ShardSet<S>) {
        for idx in 0..other.num_shards() {
            let items = other.shard_by_idx(idx).read().list();
            self.remove(items);
        }
    }
}

impl<S: BuildHasher + Clone> ShardSet<S> {
    /// Creates an empty set with the same shard count and hasher as `self`.
    pub fn empty_like(&self) -> Self {
        Self::with_shards_and_hasher(self.num_shards(), self.inner.hasher.clone())
    }

    /// Returns an independent copy of the set.
    ///
    /// # Example
    /// ```
    /// use shardset::ShardSet;
    ///
    /// let set = ShardSet::from(["a", "b"]);
    /// let copy = set.copy();
    /// copy.insert("c");
    ///
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(copy.len(), 3);
    /// ```
    pub fn copy(&self) -> Self {
        let copy = self.empty_like();
        copy.add(self.list());
        copy
    }
}

impl<S: BuildHasher> PartialEq for ShardSet<S> {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl<S: BuildHasher> Eq for ShardSet<S> {}

impl<S> fmt::Display for ShardSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.list().join(", "))
    }
}

impl<S> fmt::Debug for ShardSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for ShardSet<DefaultHashBuilder>
where
    T: AsRef<str> + Into<String>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let set = Self::new();
        set.add(iter);
        set
    }
}

impl<T, const N: usize> From<[T; N]> for ShardSet<DefaultHashBuilder>
where
    T: AsRef<str> + Into<String>,
{
    fn from(items: [T; N]) -> Self {
        Self::from_iter(items)
    }
}

impl<T, S> Extend<T> for ShardSet<S>
where
    T: AsRef<str> + Into<String>,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add(iter);
    }
}

impl<'a, S> IntoIterator for &'a ShardSet<S> {
    type Item = String;
    type IntoIter = Iter<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
