use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub prometheus_url: String,
    pub query: String,
    pub request_timeout: Duration,
    pub token_file: String,
    pub telegram_chat_id: i64,
    pub telegram_api_url: String,
    pub alert_threshold: i64,
}

/// Lowest observed free capacity of one shard.
#[derive(Debug, Clone, PartialEq)]
pub struct ShardStatus {
    pub shard: String,
    pub free_slots: i64,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TelegramMessage {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: String,
}
