//! Shard-by-shard iteration over a [`crate::ShardSet`].

enum IterState {
    Start,
    Shard(usize, std::vec::IntoIter<String>),
    Finished,
}

/// Iterator over the items of a [`crate::ShardSet`], created by [`crate::ShardSet::iter`].
///
/// Items are copied out of one shard at a time under that shard's read lock, which is released
/// before the first item is yielded. Items added to a shard the iterator has already left are not
/// seen.
pub struct Iter<S> {
    set: crate::ShardSet<S>,
    state: IterState,
}

impl<S> Iter<S> {
    pub(crate) fn new(set: crate::ShardSet<S>) -> Self {
        Self {
            set,
            state: IterState::Start,
        }
    }

    fn load(&mut self, idx: usize) {
        if idx >= self.set.num_shards() {
            self.state = IterState::Finished;
            return;
        }

        let items = self.set.shard_by_idx(idx).read().list();
        self.state = IterState::Shard(idx, items.into_iter());
    }
}

impl<S> Iterator for Iter<S> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                IterState::Start => self.load(0),
                IterState::Shard(idx, items) => match items.next() {
                    Some(item) => return Some(item),
                    None => {
                        let next = *idx + 1;
                        self.load(next);
                    }
                },
                IterState::Finished => return None,
            }
        }
    }
}

impl<S> std::iter::FusedIterator for Iter<S> {}

#[cfg(test)]
mod tests {
    #[test]
    fn test_iter() {
        let set = crate::ShardSet::new();
        set.add(["foo", "baz"]);
        let mut items = set.iter().collect::<Vec<_>>();
        items.sort();

        assert_eq!(items, ["baz", "foo"]);
    }

    #[test]
    fn test_iter_empty() {
        let set = crate::ShardSet::new();

        let mut iter = set.iter();
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_iter_single_shard() {
        let set = crate::ShardSet::with_shards(1);
        set.add((0..10).map(|i| i.to_string()));
        assert_eq!(set.iter().count(), 10);
    }

    #[test]
    fn test_iter_releases_locks() {
        let set = crate::ShardSet::with_shards(2);
        set.add((0..50).map(|i| i.to_string()));

        // Mutating the set while iterating must not deadlock.
        let mut seen = 0;
        for item in set.iter() {
            set.remove_one(&item);
            seen += 1;
        }
        assert_eq!(seen, 50);
        assert!(set.is_empty());
    }
}
