use crate::types::ShardStatus;

/// Shards at or below the alert threshold, least free capacity first
pub struct AlertReport {
    pub threshold: i64,
    pub shards: Vec<ShardStatus>,
}

impl AlertReport {
    pub fn select(statuses: Vec<ShardStatus>, threshold: i64) -> Self {
        let mut shards: Vec<ShardStatus> = statuses
            .into_iter()
            .filter(|s| s.free_slots <= threshold)
            .collect();
        shards.sort_by(|a, b| {
            a.free_slots
                .cmp(&b.free_slots)
                .then_with(|| a.shard.cmp(&b.shard))
        });
        Self { threshold, shards }
    }

    pub fn has_alerts(&self) -> bool {
        !self.shards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    /// Shard names as `[a,b,c]` for log lines
    pub fn shard_names(&self) -> String {
        let names: Vec<&str> = self.shards.iter().map(|s| s.shard.as_str()).collect();
        format!("[{}]", names.join(","))
    }
}
