//! The plugin as seen by the agent host: a key prefix, a graph catalog and a
//! per-invocation fetch.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};

use crate::config::Config;
use crate::error::PluginError;
use crate::fetcher::MetricsFetcher;
use crate::graph::{graph_definition, Graph};

#[async_trait]
pub trait MetricsPlugin: Send + Sync {
    /// Prefix of every metric key the host emits for this plugin
    fn metric_key_prefix(&self) -> &str;

    fn graph_definition(&self) -> BTreeMap<&'static str, Graph>;

    /// Current values keyed by metric name. Keys not declared in the graph
    /// catalog are allowed and ignored by the host.
    async fn fetch_metrics(&self) -> Result<HashMap<String, f64>, PluginError>;
}

/// dnsdist statistics plugin
pub struct DnsdistPlugin {
    prefix: String,
    fetcher: MetricsFetcher,
}

impl DnsdistPlugin {
    /// Build the plugin for `config`, authenticating with `api_key` when it
    /// is non-empty.
    pub fn new(config: &Config, api_key: String) -> Result<Self, PluginError> {
        let fetcher = MetricsFetcher::new(config.stats_url(), api_key, config.timeout)?;
        Ok(Self {
            prefix: config.prefix.clone(),
            fetcher,
        })
    }

    pub fn url(&self) -> &str {
        self.fetcher.url()
    }
}

#[async_trait]
impl MetricsPlugin for DnsdistPlugin {
    fn metric_key_prefix(&self) -> &str {
        &self.prefix
    }

    fn graph_definition(&self) -> BTreeMap<&'static str, Graph> {
        graph_definition(&self.prefix)
    }

    async fn fetch_metrics(&self) -> Result<HashMap<String, f64>, PluginError> {
        self.fetcher.fetch().await
    }
}
