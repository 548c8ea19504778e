use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::report::AlertReport;
use crate::types::{ShardStatus, TelegramMessage};

const SHARD_TITLE: &str = "shard";
const COUNT_TITLE: &str = "left";

pub fn render_shard_table(shards: &[ShardStatus]) -> String {
    let counts: Vec<String> = shards.iter().map(|s| s.free_slots.to_string()).collect();

    let shard_width = shards
        .iter()
        .map(|s| s.shard.chars().count())
        .chain(std::iter::once(SHARD_TITLE.len()))
        .max()
        .unwrap_or(SHARD_TITLE.len());
    let count_width = counts
        .iter()
        .map(|c| c.chars().count())
        .chain(std::iter::once(COUNT_TITLE.len()))
        .max()
        .unwrap_or(COUNT_TITLE.len());

    let separator = format!("| {} | {} |\n", "-".repeat(shard_width), "-".repeat(count_width));
    let row = |shard: &str, count: &str| {
        format!("| {:<sw$} | {:<cw$} |\n", shard, count, sw = shard_width, cw = count_width)
    };

    let mut table = String::with_capacity(256);
    table.push_str(&separator);
    table.push_str(&row(SHARD_TITLE, COUNT_TITLE));
    table.push_str(&separator);
    for (s, count) in shards.iter().zip(&counts) {
        table.push_str(&row(&s.shard, count));
    }
    table.push_str(&separator);
    table
}

pub fn build_alert_message(chat_id: i64, report: &AlertReport) -> TelegramMessage {
    let text = format!(
        "*Shard limit alert*\n\n```\n{}```\n",
        render_shard_table(&report.shards)
    );
    TelegramMessage {
        chat_id,
        text,
        parse_mode: "Markdown".to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<serde_json::Value>,
}

/// Bot API client bound to one bot token
pub struct TelegramBot {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl TelegramBot {
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Telegram HTTP client")?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    // Errors are stripped of the URL, it carries the token
    async fn call(&self, req: reqwest::RequestBuilder, method: &str) -> Result<serde_json::Value> {
        let res = req
            .send()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("Failed to send Telegram {} request", method))?;

        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        let parsed: Option<TelegramResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(r) if status.is_success() && r.ok => Ok(r.result.unwrap_or_default()),
            Some(r) => {
                let description = r.description.unwrap_or_default();
                error!("Telegram {} failed: {} - {}", method, status, description);
                Err(anyhow!("Telegram {} rejected: {} {}", method, status, description))
            }
            None => {
                error!("Telegram {} failed: {} - {}", method, status, body);
                Err(anyhow!("Telegram {} returned unexpected response: {}", method, status))
            }
        }
    }

    /// Check the token with `getMe` and return the bot username
    pub async fn verify(&self) -> Result<String> {
        let result = self
            .call(self.client.get(self.method_url("getMe")), "getMe")
            .await
            .context("bot api init error")?;
        let username = result
            .get("username")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        debug!("authorized as bot {}", username);
        Ok(username)
    }

    pub async fn send(&self, message: &TelegramMessage) -> Result<()> {
        self.call(
            self.client.post(self.method_url("sendMessage")).json(message),
            "sendMessage",
        )
        .await?;
        Ok(())
    }
}
