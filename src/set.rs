use std::hash::BuildHasher;

use crate::{LocalSet, ShardSet};

/// The operations the set-algebra functions in [`crate::ops`] are built from.
///
/// Implemented by [`ShardSet`] and [`LocalSet`]. `empty_like` is what lets a function return a
/// set of the same kind, shard count, and hasher as its first argument.
pub trait Set: Sized {
    /// Creates an empty set of the same kind and configuration as `self`.
    fn empty_like(&self) -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, item: &str) -> bool;

    /// Inserts an item. Returns `true` if it was not already present.
    fn insert(&mut self, item: &str) -> bool;

    /// Calls `f` on every item until it returns `false`.
    fn each<F>(&self, f: F)
    where
        F: FnMut(&str) -> bool;

    fn list(&self) -> Vec<String>;
}

impl<S: BuildHasher + Clone> Set for ShardSet<S> {
    fn empty_like(&self) -> Self {
        ShardSet::empty_like(self)
    }

    fn len(&self) -> usize {
        ShardSet::len(self)
    }

    fn contains(&self, item: &str) -> bool {
        ShardSet::contains(self, item)
    }

    fn insert(&mut self, item: &str) -> bool {
        ShardSet::insert(self, item)
    }

    fn each<F>(&self, f: F)
    where
        F: FnMut(&str) -> bool,
    {
        ShardSet::each(self, f)
    }

    fn list(&self) -> Vec<String> {
        ShardSet::list(self)
    }
}

impl<S: BuildHasher + Clone> Set for LocalSet<S> {
    fn empty_like(&self) -> Self {
        LocalSet::empty_like(self)
    }

    fn len(&self) -> usize {
        LocalSet::len(self)
    }

    fn contains(&self, item: &str) -> bool {
        LocalSet::contains(self, item)
    }

    fn insert(&mut self, item: &str) -> bool {
        LocalSet::insert(self, item)
    }

    fn each<F>(&self, f: F)
    where
        F: FnMut(&str) -> bool,
    {
        LocalSet::each(self, f)
    }

    fn list(&self) -> Vec<String> {
        LocalSet::list(self)
    }
}
