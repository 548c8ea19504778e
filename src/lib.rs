// Public modules
pub mod types;
pub mod error;
pub mod config;
pub mod parsing;
pub mod metrics;
pub mod collector;
pub mod report;
pub mod telegram;
pub mod runner;

// Re-export commonly used items
pub use types::*;
pub use error::ShardDecodeError;
pub use config::{
    load_config, config_from_args, read_bot_token, read_bot_token_with_env, resolve_path,
    Args, EnvironmentProvider, SystemEnvironment, MockEnvironment,
};
pub use parsing::{parse_duration, parse_free_slots, parse_sample_time};
pub use metrics::{decode_response, reduce_shard_statuses, CATEGORY_SHARD_TYPE};
pub use collector::ShardCollector;
pub use report::AlertReport;
pub use telegram::{build_alert_message, render_shard_table, TelegramBot};
pub use runner::{run_check, CheckOutcome};
