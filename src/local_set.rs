use std::{fmt, hash::BuildHasher};

use crate::{shard::Shard, DefaultHashBuilder};

/// A set of strings for single-threaded use.
///
/// Same operations as [`crate::ShardSet`], backed by a single unlocked shard. Mutation takes
/// `&mut self`, and cloning produces an independent copy.
///
/// # Example
/// ```
/// use shardset::LocalSet;
///
/// let mut set = LocalSet::from(["a", "b"]);
/// set.insert("c");
/// assert_eq!(set.len(), 3);
/// assert!(set.pop().is_some());
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Clone)]
pub struct LocalSet<S = DefaultHashBuilder> {
    items: Shard,
    hasher: S,
}

impl LocalSet<DefaultHashBuilder> {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self::with_capacity_and_hasher(cap, DefaultHashBuilder::default())
    }
}

impl Default for LocalSet<DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> LocalSet<S> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter()
    }

    /// Calls `f` on every item until it returns `false`.
    pub fn each<F>(&self, f: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.items.each(f);
    }

    pub fn list(&self) -> Vec<String> {
        self.items.list()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Removes and returns an arbitrary item, or `None` if the set is empty.
    pub fn pop(&mut self) -> Option<String> {
        self.items.pop()
    }
}

impl<S: BuildHasher> LocalSet<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(cap: usize, hasher: S) -> Self {
        Self {
            items: Shard::with_capacity(cap),
            hasher,
        }
    }

    /// Inserts an item. Returns `true` if it was not already present.
    pub fn insert<T>(&mut self, item: T) -> bool
    where
        T: AsRef<str> + Into<String>,
    {
        let hash = self.hasher.hash_one(item.as_ref());
        self.items.insert(hash, item, &self.hasher)
    }

    /// Inserts every item of `items`, returning how many were new.
    pub fn add<I, T>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str> + Into<String>,
    {
        self.items.add(items, &self.hasher)
    }

    /// Removes an item. Returns `true` if it was present.
    pub fn remove_one(&mut self, item: &str) -> bool {
        let hash = self.hasher.hash_one(item);
        self.items.remove(hash, item)
    }

    /// Removes every item of `items`, returning how many were present.
    pub fn remove<I, T>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.items.remove_all(items, &self.hasher)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains(self.hasher.hash_one(item), item)
    }

    /// Returns `true` if the set contains every item of `items`. Returns `false` if `items` is
    /// empty.
    pub fn has<I, T>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut items = items.into_iter().peekable();
        if items.peek().is_none() {
            return false;
        }

        items.all(|item| self.contains(item.as_ref()))
    }

    pub fn is_equal(&self, other: &LocalSet<S>) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }

    /// Returns `true` if every item of `other` is in `self`. An empty `other` always is.
    pub fn is_subset(&self, other: &LocalSet<S>) -> bool {
        other.len() <= self.len() && other.iter().all(|item| self.contains(item))
    }

    /// Returns `true` if every item of `self` is in `other`.
    pub fn is_superset(&self, other: &LocalSet<S>) -> bool {
        other.is_subset(self)
    }

    pub fn merge(&mut self, other: &LocalSet<S>) {
        self.items.add(other.iter(), &self.hasher);
    }

    /// Removes every item of `other` from `self`.
    pub fn separate(&mut self, other: &LocalSet<S>) {
        self.items.remove_all(other.iter(), &self.hasher);
    }
}

impl<S: BuildHasher + Clone> LocalSet<S> {
    /// Creates an empty set with the same hasher as `self`.
    pub fn empty_like(&self) -> Self {
        Self::with_hasher(self.hasher.clone())
    }

    /// Returns an independent copy of the set.
    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl<S: BuildHasher> PartialEq for LocalSet<S> {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl<S: BuildHasher> Eq for LocalSet<S> {}

impl<S> fmt::Display for LocalSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.list().join(", "))
    }
}

impl<S> fmt::Debug for LocalSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for LocalSet<DefaultHashBuilder>
where
    T: AsRef<str> + Into<String>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.add(iter);
        set
    }
}

impl<T, const N: usize> From<[T; N]> for LocalSet<DefaultHashBuilder>
where
    T: AsRef<str> + Into<String>,
{
    fn from(items: [T; N]) -> Self {
        Self::from_iter(items)
    }
}

impl<T, S> Extend<T> for LocalSet<S>
where
    T: AsRef<str> + Into<String>,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localset() {
        let mut set = LocalSet::new();
        assert!(set.insert("foo"));
        assert!(!set.insert("foo"));
        assert_eq!(set.len(), 1);
        assert!(set.contains("foo"));
        assert!(set.remove_one("foo"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_localset_remove_mixed() {
        let mut set = LocalSet::from(["a", "b", "c"]);
        assert_eq!(set.remove(["a", "a", "zz", "c"]), 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.remove(["zz"]), 0);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_localset_has() {
        let set = LocalSet::from(["a", "b"]);
        assert!(set.has(["a", "b"]));
        assert!(!set.has(["a", "x"]));
        assert!(!set.has(Vec::<String>::new()));
        assert!(!LocalSet::new().has(["a"]));
    }

    #[test]
    fn test_localset_relations() {
        let big = LocalSet::from(["a", "b", "c"]);
        let small = LocalSet::from(["a", "b"]);
        assert!(big.is_subset(&small));
        assert!(small.is_superset(&big));
        assert!(!small.is_subset(&big));
        assert!(big.is_equal(&big.copy()));
        assert_ne!(big, small);
    }

    #[test]
    fn test_localset_relations_with_empty() {
        let set = LocalSet::from(["a", "b"]);
        let empty = LocalSet::new();
        let also_empty = LocalSet::with_capacity(16);

        assert!(set.is_subset(&empty));
        assert!(!empty.is_subset(&set));
        assert!(empty.is_subset(&also_empty));
        assert!(empty.is_superset(&set));
        assert!(!set.is_superset(&empty));
        assert!(empty.is_superset(&also_empty));
        assert!(empty.is_equal(&also_empty));
        assert_eq!(empty, also_empty);
        assert_ne!(empty, set);
    }

    #[test]
    fn test_localset_merge_separate() {
        let mut set = LocalSet::from(["a", "b"]);
        let other = LocalSet::from(["b", "c"]);
        set.merge(&other);
        assert_eq!(set.len(), 3);
        set.separate(&other);
        assert_eq!(set.list(), ["a"]);
    }

    #[test]
    fn test_localset_copy_is_independent() {
        let set = LocalSet::from(["a"]);
        let mut copy = set.copy();
        copy.insert("b");
        assert_eq!(set.len(), 1);
        assert_eq!(copy.len(), 2);
    }

    #[test]
    fn test_localset_display() {
        assert_eq!(LocalSet::from(["a"]).to_string(), "[a]");
        assert_eq!(LocalSet::new().to_string(), "[]");
    }
}
