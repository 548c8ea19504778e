use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct PrometheusResponse {
    pub status: String,
    #[serde(default)]
    pub data: PrometheusData,
    #[serde(default, rename = "errorType")]
    pub error_type: String,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PrometheusData {
    #[serde(default, rename = "resultType")]
    pub result_type: String,
    #[serde(default)]
    pub result: Vec<PrometheusResult>,
}

#[derive(Debug, Deserialize)]
pub struct PrometheusResult {
    #[serde(default)]
    pub metric: PrometheusResultMetric,
    #[serde(default)]
    pub value: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PrometheusResultMetric {
    #[serde(default, rename = "__name__")]
    pub name: String,
    #[serde(default)]
    pub shard: String,
    #[serde(default)]
    pub shard_type: String,
}

/// Instant query endpoint under the given server base URL.
pub fn build_query_url(base_url: &str) -> String {
    format!("{}/api/v1/query", base_url.trim_end_matches('/'))
}

pub fn decode_response(body: &[u8]) -> Result<PrometheusResponse> {
    let resp: PrometheusResponse =
        serde_json::from_slice(body).context("Failed to decode query response JSON")?;
    if resp.status == "error" {
        return Err(anyhow!(
            "prometheus response error: type: {}; msg: {}",
            resp.error_type,
            resp.error
        ));
    }
    for w in &resp.warnings {
        warn!("prometheus warning: {}", w);
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_url() {
        assert_eq!(
            build_query_url("http://localhost:9090/"),
            "http://localhost:9090/api/v1/query"
        );
        assert_eq!(
            build_query_url("http://prom.internal:9090"),
            "http://prom.internal:9090/api/v1/query"
        );
    }

    #[test]
    fn test_decode_success_response() {
        let body = br#"{
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [
                    {
                        "metric": {"__name__": "free", "shard": "cat-1", "shard_type": "category"},
                        "value": [1700000000.123, "250"]
                    }
                ]
            }
        }"#;

        let resp = decode_response(body).unwrap();
        assert_eq!(resp.status, "success");
        assert_eq!(resp.data.result_type, "vector");
        assert_eq!(resp.data.result.len(), 1);
        assert_eq!(resp.data.result[0].metric.name, "free");
        assert_eq!(resp.data.result[0].metric.shard, "cat-1");
        assert_eq!(resp.data.result[0].metric.shard_type, "category");
        assert_eq!(resp.data.result[0].value.len(), 2);
    }

    #[test]
    fn test_decode_missing_labels_default_to_empty() {
        let body = br#"{"status":"success","data":{"resultType":"vector","result":[{"metric":{},"value":[1,"1"]}]}}"#;
        let resp = decode_response(body).unwrap();
        assert_eq!(resp.data.result[0].metric.shard, "");
        assert_eq!(resp.data.result[0].metric.shard_type, "");
    }

    #[test]
    fn test_decode_error_status() {
        let body = br#"{"status":"error","errorType":"bad_data","error":"parse error at char 4"}"#;
        let err = decode_response(body).unwrap_err().to_string();
        assert!(err.contains("bad_data"));
        assert!(err.contains("parse error at char 4"));
    }

    #[test]
    fn test_decode_warnings_are_not_fatal() {
        let body = br#"{"status":"success","data":{"resultType":"vector","result":[]},"warnings":["partial response"]}"#;
        let resp = decode_response(body).unwrap();
        assert_eq!(resp.warnings, vec!["partial response"]);
        assert!(resp.data.result.is_empty());
    }

    #[test]
    fn test_decode_invalid_json() {
        let result = decode_response(b"<html>gateway timeout</html>");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("decode"));
    }
}
