/// Errors returned when building a set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid shard count {0}: a set needs at least one shard")]
    InvalidShardCount(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
