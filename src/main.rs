use anyhow::Result;
use tracing::{error, info};

use shard_capacity_alert::config::{load_config, read_bot_token};
use shard_capacity_alert::runner::run_check;
use shard_capacity_alert::telegram::TelegramBot;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = load_config()?;
    info!(
        "prometheus_url = {}, query = {}, threshold = {}, chat_id = {}, token_file = {}",
        cfg.prometheus_url, cfg.query, cfg.alert_threshold, cfg.telegram_chat_id, cfg.token_file
    );

    let token = read_bot_token(&cfg.token_file)?;
    let bot = TelegramBot::new(&cfg.telegram_api_url, &token, cfg.request_timeout)?;
    let username = bot.verify().await?;
    info!("authorized on telegram as {}", username);

    let outcome = run_check(&cfg, &bot).await?;
    info!("check finished: {:?}", outcome);
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
