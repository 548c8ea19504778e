use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::parsing::parse_duration;
use crate::types::Config;

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[derive(Debug, Parser)]
#[command(name = "shard-capacity-alert")]
#[command(about = "Alert a Telegram chat about catalog shards running out of free slots", long_about = None)]
pub struct Args {
    /// Prometheus server address with scheme, host and port
    #[arg(long, env = "PROMETHEUS_URL", default_value = "http://localhost:9090/")]
    pub prometheus_url: String,

    /// Expression sent as the query API param
    #[arg(
        long,
        env = "METRICS_QUERY",
        default_value = "wbx_catalog_storage_limit-wbx_catalog_storage_size"
    )]
    pub query: String,

    /// Request timeout for the Prometheus and Telegram APIs (e.g. 2s, 500ms)
    #[arg(long, env = "REQUEST_TIMEOUT", default_value = "2s", value_parser = parse_timeout)]
    pub request_timeout: Duration,

    /// Path to file with the Telegram bot token (talk to @BotFather to get one)
    #[arg(long, env = "TELEGRAM_BOT_TOKEN_FILE", default_value = "~/.secret/telegram.bot.token")]
    pub telegram_bot_token_file: String,

    /// Telegram chat id to report alerts to
    #[arg(long, env = "TELEGRAM_CHAT_ID", allow_negative_numbers = true)]
    pub telegram_chat_id: Option<i64>,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API_URL", default_value = "https://api.telegram.org")]
    pub telegram_api_url: String,

    /// Send an alert if at least one shard has this many free slots or fewer
    #[arg(long, env = "ALERT_THRESHOLD", default_value_t = 1000, allow_negative_numbers = true)]
    pub alert_threshold: i64,
}

fn parse_timeout(s: &str) -> std::result::Result<Duration, String> {
    parse_duration(s).ok_or_else(|| format!("invalid duration {:?}, expected e.g. 2s or 500ms", s))
}

pub fn load_config() -> Result<Config> {
    config_from_args(Args::parse())
}

pub fn config_from_args(args: Args) -> Result<Config> {
    let telegram_chat_id = match args.telegram_chat_id {
        Some(id) if id != 0 => id,
        _ => {
            return Err(anyhow!(
                "telegram-chat-id is required, add @RawDataBot to your chat to find it out"
            ))
        }
    };

    if args.prometheus_url.trim().is_empty() {
        return Err(anyhow!("prometheus-url must not be empty"));
    }
    if args.query.trim().is_empty() {
        return Err(anyhow!("query must not be empty"));
    }

    Ok(Config {
        prometheus_url: args.prometheus_url,
        query: args.query,
        request_timeout: args.request_timeout,
        token_file: args.telegram_bot_token_file,
        telegram_chat_id,
        telegram_api_url: args.telegram_api_url,
        alert_threshold: args.alert_threshold,
    })
}

/// Expands a leading `~/` to `$HOME` and makes relative paths absolute.
pub fn resolve_path<E: EnvironmentProvider>(path: &str, env: &E) -> Result<PathBuf> {
    let path = if path == "~" || path.starts_with("~/") {
        let home = env
            .get_var("HOME")
            .filter(|h| !h.is_empty())
            .ok_or_else(|| anyhow!("HOME is not set, cannot expand {:?}", path))?;
        Path::new(&home).join(path.trim_start_matches('~').trim_start_matches('/'))
    } else {
        PathBuf::from(path)
    };

    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir()
        .with_context(|| format!("Failed to make absolute path from {:?}", path))?;
    Ok(cwd.join(path))
}

pub fn read_bot_token(path: &str) -> Result<String> {
    read_bot_token_with_env(path, &SystemEnvironment)
}

pub fn read_bot_token_with_env<E: EnvironmentProvider>(path: &str, env: &E) -> Result<String> {
    let path = resolve_path(path, env)?;
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read telegram token from file {:?}", path))?;
    let token = raw.trim().to_string();
    if token.is_empty() {
        return Err(anyhow!("telegram token file {:?} is empty", path));
    }
    Ok(token)
}
