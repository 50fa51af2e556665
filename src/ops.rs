//! Set algebra over any number of sets.
//!
//! Every function builds a new set with [`Set::empty_like`] on its first argument, so the result
//! is of the same kind (and, for a [`crate::ShardSet`], has the same shard count and hasher).
//! Inputs are only read through their public operations; for concurrent sets, each input is seen
//! as it was at some point during the call, not as a snapshot taken at one instant.
//!
//! # Example
//! ```
//! use shardset::{ops, ShardSet};
//!
//! let s = ShardSet::from(["1", "2", "3"]);
//! let r = ShardSet::from(["3", "4", "5"]);
//! let x = ShardSet::from(["5", "6", "7"]);
//!
//! assert_eq!(ops::union(&[&s, &r, &x]).len(), 7);
//! assert_eq!(ops::difference(&[&s, &r, &x]).len(), 2);
//! assert_eq!(ops::symmetric_difference(&s, &r).len(), 4);
//! ```
use crate::Set;

fn first<'a, S>(sets: &[&'a S], op: &str) -> &'a S {
    match sets.first() {
        Some(set) => *set,
        None => panic!("{op} needs at least one set"),
    }
}

/// Returns every item present in at least one of `sets`.
///
/// # Panics
/// Panics if `sets` is empty.
pub fn union<S: Set>(sets: &[&S]) -> S {
    let mut result = first(sets, "union").empty_like();

    for set in sets {
        set.each(|item| {
            if !result.contains(item) {
                result.insert(item);
            }
            true
        });
    }

    result
}

/// Returns the items of `sets[0]` that are in none of the other sets. With a single set, the
/// result is a copy of it.
///
/// # Panics
/// Panics if `sets` is empty.
pub fn difference<S: Set>(sets: &[&S]) -> S {
    let base = first(sets, "difference");
    let mut result = base.empty_like();

    base.each(|item| {
        if !sets[1..].iter().any(|set| set.contains(item)) {
            result.insert(item);
        }
        true
    });

    result
}

/// Returns the items present in every one of `sets`.
///
/// The smallest set is walked and every other set probed, so the cost follows the size of the
/// smallest input.
///
/// # Panics
/// Panics if `sets` is empty.
pub fn intersection<S: Set>(sets: &[&S]) -> S {
    let mut result = first(sets, "intersection").empty_like();
    let smallest = smallest_index(sets);

    sets[smallest].each(|item| {
        let in_all = sets
            .iter()
            .enumerate()
            .all(|(idx, set)| idx == smallest || set.contains(item));
        if in_all {
            result.insert(item);
        }
        true
    });

    result
}

/// Index of the set with the fewest items. Ties go to the lowest index.
pub(crate) fn smallest_index<S: Set>(sets: &[&S]) -> usize {
    sets.iter()
        .enumerate()
        .min_by_key(|(_, set)| set.len())
        .map_or(0, |(idx, _)| idx)
}

/// Returns the items in exactly one of `a` and `b`.
pub fn symmetric_difference<S: Set>(a: &S, b: &S) -> S {
    let left = difference(&[a, b]);
    let right = difference(&[b, a]);
    union(&[&left, &right])
}

/// Returns the items of `set` as a `Vec`.
pub fn string_slice<S: Set>(set: &S) -> Vec<String> {
    set.list()
}
