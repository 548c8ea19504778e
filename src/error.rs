use thiserror::Error;

/// Reasons a single query result entry cannot be turned into a shard status.
#[derive(Debug, Error, PartialEq)]
pub enum ShardDecodeError {
    #[error("value for shard {shard} has {len} elements, expected [timestamp, value]")]
    ShortValue { shard: String, len: usize },

    #[error("invalid value for shard {shard}: {value}")]
    InvalidValue { shard: String, value: String },

    #[error("invalid timestamp for shard {shard}: {value}")]
    InvalidTimestamp { shard: String, value: String },
}
