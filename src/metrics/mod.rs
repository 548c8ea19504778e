// Query response decoding and shard reduction
pub mod base;
pub mod shards;

pub use base::{build_query_url, decode_response, PrometheusResponse, PrometheusResult};
pub use shards::{reduce_shard_statuses, shard_status_from_result, CATEGORY_SHARD_TYPE};
