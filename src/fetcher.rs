//! Stats fetcher for the dnsdist JSON statistics endpoint
//!
//! Issues a single GET against `/jsonstat?command=stats` and flattens the
//! returned object into `name -> f64`, dropping anything that is not numeric.

use reqwest::{redirect, Client};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::PluginError;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP client wrapper for fetching dnsdist stats
pub struct MetricsFetcher {
    client: Client,
    url: String,
    api_key: String,
}

impl MetricsFetcher {
    /// Create a new fetcher
    ///
    /// # Arguments
    /// * `url` - Full URL of the stats endpoint
    /// * `api_key` - Sent as `X-API-Key` unless empty
    /// * `timeout` - Bound for connecting and for the whole exchange; zero disables it
    pub fn new(url: String, api_key: String, timeout: Duration) -> Result<Self, PluginError> {
        let mut builder = Client::builder().redirect(redirect::Policy::none());
        // zero means no limit
        if !timeout.is_zero() {
            builder = builder
                .connect_timeout(timeout)
                .tcp_keepalive(timeout)
                .timeout(timeout);
        }
        let client = builder.build().map_err(PluginError::Client)?;

        Ok(Self {
            client,
            url,
            api_key,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and coerce the current counters
    ///
    /// The response status is not checked: any response carrying a JSON
    /// object is used, redirects included.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Network request fails or times out
    /// - Response body is not a JSON object
    pub async fn fetch(&self) -> Result<HashMap<String, f64>, PluginError> {
        let mut request = self.client.get(&self.url);
        if !self.api_key.is_empty() {
            request = request.header(API_KEY_HEADER, &self.api_key);
        }

        tracing::debug!(url = %self.url, "fetching dnsdist stats");
        let response = request.send().await.map_err(PluginError::Request)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, status = %status, "stats endpoint returned non-success status");
        }

        let body = response.bytes().await.map_err(PluginError::Request)?;
        let stats: Map<String, Value> = serde_json::from_slice(&body)?;

        Ok(coerce_metrics(stats))
    }
}

/// Convert every numeric field to `f64`, silently dropping the rest
pub fn coerce_metrics(stats: Map<String, Value>) -> HashMap<String, f64> {
    stats
        .into_iter()
        .filter_map(|(name, value)| match coerce_value(&value) {
            Some(v) => Some((name, v)),
            None => {
                tracing::trace!(metric = %name, "skipping non-numeric stat");
                None
            }
        })
        .collect()
}

/// Numbers keep their literal text until this point, so large counters are
/// parsed straight from the digits the server sent.
fn coerce_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => parse_float(&n.to_string()),
        Value::String(s) => parse_float(s),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse a float, rejecting values that overflow `f64`
fn parse_float(s: &str) -> Option<f64> {
    let v: f64 = s.parse().ok()?;
    if v.is_infinite() && !is_infinity_literal(s) {
        return None;
    }
    Some(v)
}

fn is_infinity_literal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_fetcher_creation() {
        let url = "http://127.0.0.1:8083/jsonstat?command=stats".to_string();
        let fetcher = MetricsFetcher::new(url.clone(), String::new(), Duration::from_secs(30)).unwrap();
        assert_eq!(fetcher.url(), url);
    }

    #[test]
    fn test_coerce_drops_non_numeric() {
        let stats = object(json!({
            "queries": 42,
            "latency-avg1000000": "55.5",
            "acl-drops": true,
            "nested": {"a": 1},
            "list": [1, 2],
            "missing": null,
            "version": "1.8.0"
        }));

        let metrics = coerce_metrics(stats);
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics["queries"], 42.0);
        assert_eq!(metrics["latency-avg1000000"], 55.5);
    }

    #[test]
    fn test_coerce_keeps_large_counters() {
        let stats: Map<String, Value> =
            serde_json::from_str(r#"{"responses": 18446744073709551615, "uptime": 1e3}"#).unwrap();
        let metrics = coerce_metrics(stats);
        assert_eq!(metrics["responses"], 18446744073709551615_f64);
        assert_eq!(metrics["uptime"], 1000.0);
    }

    #[test]
    fn test_coerce_rejects_overflow() {
        let stats: Map<String, Value> =
            serde_json::from_str(r#"{"huge": "2e999", "tiny": "-1e999"}"#).unwrap();
        assert!(coerce_metrics(stats).is_empty());
    }

    #[test]
    fn test_parse_float_special_values() {
        assert_eq!(parse_float("Inf"), Some(f64::INFINITY));
        assert_eq!(parse_float("-infinity"), Some(f64::NEG_INFINITY));
        assert!(parse_float("NaN").unwrap().is_nan());
        assert_eq!(parse_float("-3"), Some(-3.0));
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float(" 1"), None);
        assert_eq!(parse_float("12abc"), None);
    }
}
