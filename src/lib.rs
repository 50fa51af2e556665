//! A concurrent set of strings using a sharding strategy, plus set algebra over it.
//!
//! [`ShardSet`] spreads its items over a fixed number of independently locked shards and keeps
//! a global atomic length. [`LocalSet`] offers the same operations without locking for
//! single-threaded use. The functions in [`ops`] (union, intersection, difference, symmetric
//! difference) work on either kind through the [`Set`] trait.
//!
//! # Examples
//! ```
//! use shardset::{ops, ShardSet};
//!
//! let set = ShardSet::new();
//! set.add(["foo", "bar"]);
//! assert_eq!(set.len(), 2);
//! assert!(set.contains("foo"));
//! assert!(!set.contains("baz"));
//!
//! let other = ShardSet::from(["bar", "baz"]);
//! let both = ops::intersection(&[&set, &other]);
//! assert_eq!(both.list(), ["bar"]);
//!
//! assert_eq!(set.pop().is_some(), true);
//! assert_eq!(set.len(), 1);
//! ```
mod error;
mod hash;
pub mod iter;
mod local_set;
pub mod ops;
mod set;
mod shard;
mod shard_set;

pub use error::{Error, Result};
pub use hash::{bucket_index, DefaultHashBuilder};
pub use local_set::LocalSet;
pub use set::Set;
pub use shard_set::{ShardSet, DEFAULT_SHARDS};
