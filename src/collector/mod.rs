use anyhow::{anyhow, Context, Result};
use std::time::Instant;
use tracing::{error, info};

use crate::metrics::{build_query_url, decode_response, reduce_shard_statuses};
use crate::types::{Config, ShardStatus};

/// Runs the capacity query against the metrics server
pub struct ShardCollector<'a> {
    client: reqwest::Client,
    config: &'a Config,
}

impl<'a> ShardCollector<'a> {
    pub fn new(config: &'a Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    /// Issue the query and return the raw response body
    pub async fn fetch_query(&self) -> Result<Vec<u8>> {
        let url = build_query_url(&self.config.prometheus_url);
        let res = self
            .client
            .get(&url)
            .query(&[("query", self.config.query.as_str())])
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!("Query request failed: {} - {}", status, body);
            return Err(anyhow!("req {:?} status code: {}", url, status.as_u16()));
        }

        let body = res
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;
        Ok(body.to_vec())
    }

    /// Fetch, decode and reduce to one status per shard
    pub async fn collect_shard_statuses(&self) -> Result<Vec<ShardStatus>> {
        info!("send prometheus request to {}", self.config.prometheus_url);
        let started = Instant::now();
        let body = self.fetch_query().await;
        info!("request complete in {:?}", started.elapsed());

        let resp = decode_response(&body?)?;
        let statuses = reduce_shard_statuses(&resp.data.result)?;
        info!(
            "{} results decoded into {} category shards",
            resp.data.result.len(),
            statuses.len()
        );
        Ok(statuses)
    }
}
