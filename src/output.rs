//! Rendering for the monitoring agent
//!
//! Two modes: graph metadata, requested by the agent through an environment
//! variable, and one line per known metric value otherwise.

use anyhow::Result;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use crate::graph::Graph;
use crate::plugin::MetricsPlugin;

/// Set (non-empty) by the agent when it wants graph definitions
pub const META_ENV: &str = "MACKEREL_AGENT_PLUGIN_META";

const META_HEADER: &str = "# mackerel-agent-plugin";

#[derive(Serialize)]
struct GraphMeta<'a> {
    graphs: BTreeMap<String, &'a Graph>,
}

pub fn meta_requested() -> bool {
    std::env::var_os(META_ENV).is_some_and(|v| !v.is_empty())
}

/// Header line plus the JSON graph catalog, graph keys prefixed with `prefix`
pub fn render_meta(prefix: &str, graphs: &BTreeMap<&'static str, Graph>) -> Result<String> {
    let meta = GraphMeta {
        graphs: graphs
            .iter()
            .map(|(key, graph)| (format!("{}.{}", prefix, key), graph))
            .collect(),
    };
    Ok(format!("{}\n{}\n", META_HEADER, serde_json::to_string(&meta)?))
}

/// `<prefix>.<graph>.<metric>\t<value>\t<epoch>` for every catalog metric
/// present in `values` with a finite value, in catalog order
pub fn render_values(
    prefix: &str,
    graphs: &BTreeMap<&'static str, Graph>,
    values: &HashMap<String, f64>,
    now: i64,
) -> String {
    let mut out = String::new();
    for (key, graph) in graphs {
        for metric in &graph.metrics {
            if let Some(value) = values.get(metric.name) {
                if !value.is_finite() {
                    tracing::warn!(metric = metric.name, value = %value, "skipping non-finite value");
                    continue;
                }
                out.push_str(&format!(
                    "{}.{}.{}\t{:.6}\t{}\n",
                    prefix, key, metric.name, value, now
                ));
            }
        }
    }
    out
}

/// Run one invocation of `plugin`, writing the agent protocol to `out`
pub async fn run<P>(plugin: &P, out: &mut impl Write) -> Result<()>
where
    P: MetricsPlugin + ?Sized,
{
    let prefix = plugin.metric_key_prefix();
    let graphs = plugin.graph_definition();

    if meta_requested() {
        out.write_all(render_meta(prefix, &graphs)?.as_bytes())?;
        return Ok(());
    }

    let values = plugin.fetch_metrics().await.inspect_err(|e| {
        tracing::error!(kind = e.kind(), error = %e, "failed to fetch metrics");
    })?;

    let unknown = values
        .keys()
        .filter(|name| {
            !graphs
                .values()
                .any(|g| g.metrics.iter().any(|m| m.name == name.as_str()))
        })
        .count();
    tracing::debug!(fetched = values.len(), unknown, "fetched dnsdist stats");

    let now = chrono::Utc::now().timestamp();
    out.write_all(render_values(prefix, &graphs, &values, now).as_bytes())?;
    out.flush()?;
    Ok(())
}
