use anyhow::{Context, Result};
use tracing::info;

use crate::collector::ShardCollector;
use crate::report::AlertReport;
use crate::telegram::{build_alert_message, TelegramBot};
use crate::types::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    NothingToAlert,
    Alerted { shards: usize },
}

/// One pass: query, select shards under the threshold, notify the chat.
pub async fn run_check(config: &Config, bot: &TelegramBot) -> Result<CheckOutcome> {
    let collector = ShardCollector::new(config)?;
    let statuses = collector
        .collect_shard_statuses()
        .await
        .context("Failed to collect shard statuses")?;

    let report = AlertReport::select(statuses, config.alert_threshold);
    if !report.has_alerts() {
        info!("no shard requires a limit increase");
        return Ok(CheckOutcome::NothingToAlert);
    }

    info!(
        "shard limits alert for {} (threshold {})",
        report.shard_names(),
        report.threshold
    );
    let message = build_alert_message(config.telegram_chat_id, &report);
    bot.send(&message)
        .await
        .context("alert send telegram error")?;

    Ok(CheckOutcome::Alerted { shards: report.len() })
}
