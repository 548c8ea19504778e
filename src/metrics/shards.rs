use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::ShardDecodeError;
use crate::metrics::base::PrometheusResult;
use crate::parsing::{parse_free_slots, parse_sample_time};
use crate::types::ShardStatus;

/// Only shards with this `shard_type` label are checked.
pub const CATEGORY_SHARD_TYPE: &str = "category";

/// Convert one query result entry. Returns `Ok(None)` for entries of another
/// shard type.
pub fn shard_status_from_result(
    result: &PrometheusResult,
) -> Result<Option<ShardStatus>, ShardDecodeError> {
    if result.metric.shard_type != CATEGORY_SHARD_TYPE {
        return Ok(None);
    }
    let shard = result.metric.shard.clone();

    if result.value.len() < 2 {
        return Err(ShardDecodeError::ShortValue { shard, len: result.value.len() });
    }

    let free_slots = match parse_free_slots(&result.value[1]) {
        Some(v) => v,
        None => {
            return Err(ShardDecodeError::InvalidValue {
                shard,
                value: result.value[1].to_string(),
            })
        }
    };
    let observed_at = match parse_sample_time(&result.value[0]) {
        Some(t) => t,
        None => {
            return Err(ShardDecodeError::InvalidTimestamp {
                shard,
                value: result.value[0].to_string(),
            })
        }
    };

    Ok(Some(ShardStatus { shard, free_slots, observed_at }))
}

/// Keep one status per shard: the one with the least free capacity.
pub fn reduce_shard_statuses(
    results: &[PrometheusResult],
) -> Result<Vec<ShardStatus>, ShardDecodeError> {
    let mut by_shard: HashMap<String, ShardStatus> = HashMap::new();

    for result in results {
        let status = match shard_status_from_result(result)? {
            Some(s) => s,
            None => continue,
        };
        match by_shard.entry(status.shard.clone()) {
            Entry::Occupied(mut existing) => {
                if existing.get().free_slots > status.free_slots {
                    existing.insert(status);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(status);
            }
        }
    }

    Ok(by_shard.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::base::PrometheusResultMetric;
    use serde_json::json;

    fn create_result(shard: &str, shard_type: &str, value: serde_json::Value) -> PrometheusResult {
        PrometheusResult {
            metric: PrometheusResultMetric {
                name: String::new(),
                shard: shard.to_string(),
                shard_type: shard_type.to_string(),
            },
            value: vec![json!(1700000000.25), value],
        }
    }

    fn sorted(mut statuses: Vec<ShardStatus>) -> Vec<(String, i64)> {
        statuses.sort_by(|a, b| a.shard.cmp(&b.shard));
        statuses.into_iter().map(|s| (s.shard, s.free_slots)).collect()
    }

    #[test]
    fn test_duplicates_keep_minimum() {
        let results = vec![
            create_result("A", "category", json!("500")),
            create_result("B", "category", json!("1500")),
            create_result("A", "category", json!("300")),
        ];

        let statuses = reduce_shard_statuses(&results).unwrap();
        assert_eq!(
            sorted(statuses),
            vec![("A".to_string(), 300), ("B".to_string(), 1500)]
        );
    }

    #[test]
    fn test_duplicates_keep_minimum_regardless_of_order() {
        let results = vec![
            create_result("A", "category", json!("300")),
            create_result("A", "category", json!("500")),
            create_result("A", "category", json!("700")),
        ];

        let statuses = reduce_shard_statuses(&results).unwrap();
        assert_eq!(sorted(statuses), vec![("A".to_string(), 300)]);
    }

    #[test]
    fn test_other_shard_types_excluded() {
        let results = vec![
            create_result("A", "category", json!("10")),
            create_result("B", "brand", json!("5")),
            create_result("C", "", json!("1")),
        ];

        let statuses = reduce_shard_statuses(&results).unwrap();
        assert_eq!(sorted(statuses), vec![("A".to_string(), 10)]);
    }

    #[test]
    fn test_other_shard_types_not_validated() {
        // A malformed value on an ignored shard type is skipped, not fatal
        let results = vec![create_result("B", "brand", json!("garbage"))];
        assert!(reduce_shard_statuses(&results).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_value_is_error() {
        let results = vec![create_result("A", "category", json!("lots"))];
        let err = reduce_shard_statuses(&results).unwrap_err();
        assert_eq!(
            err,
            ShardDecodeError::InvalidValue { shard: "A".to_string(), value: "\"lots\"".to_string() }
        );
    }

    #[test]
    fn test_invalid_timestamp_is_error() {
        let mut result = create_result("A", "category", json!("1"));
        result.value[0] = json!("yesterday");
        let err = shard_status_from_result(&result).unwrap_err();
        assert!(matches!(err, ShardDecodeError::InvalidTimestamp { .. }));
        assert!(err.to_string().contains("shard A"));
    }

    #[test]
    fn test_short_value_is_error() {
        let mut result = create_result("A", "category", json!("1"));
        result.value.truncate(1);
        let err = shard_status_from_result(&result).unwrap_err();
        assert_eq!(err, ShardDecodeError::ShortValue { shard: "A".to_string(), len: 1 });
    }

    #[test]
    fn test_observation_time_is_kept() {
        let result = create_result("A", "category", json!("1"));
        let status = shard_status_from_result(&result).unwrap().unwrap();
        assert_eq!(status.observed_at.timestamp(), 1_700_000_000);
        assert_eq!(status.observed_at.timestamp_subsec_millis(), 250);
    }
}
