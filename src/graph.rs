//! Graph catalog
//!
//! Static description of every dnsdist graph the plugin publishes. Metric
//! names, stacking and diff flags are relied on by existing dashboards and
//! must not change.

use serde::Serialize;
use std::collections::BTreeMap;

/// Display unit of a graph, as understood by the monitoring agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "percentage")]
    Percentage,
    #[serde(rename = "seconds")]
    Seconds,
    #[serde(rename = "milliseconds")]
    Milliseconds,
    #[serde(rename = "bytes")]
    Bytes,
    #[serde(rename = "bytes/sec")]
    BytesPerSec,
    #[serde(rename = "bits/sec")]
    BitsPerSec,
    #[serde(rename = "iops")]
    Iops,
}

/// One line of a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub name: &'static str,
    pub label: &'static str,
    pub stacked: bool,
    /// Value is published as the delta since the previous run
    #[serde(skip)]
    pub diff: bool,
}

impl Metric {
    const fn new(name: &'static str, label: &'static str, stacked: bool, diff: bool) -> Self {
        Self {
            name,
            label,
            stacked,
            diff,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    pub label: String,
    pub unit: Unit,
    pub metrics: Vec<Metric>,
}

/// Graph definitions keyed by graph name, with labels prefixed by the
/// title-cased `prefix`.
pub fn graph_definition(prefix: &str) -> BTreeMap<&'static str, Graph> {
    let label_prefix = title_case(prefix);
    let graph = |text: &str, metrics: Vec<Metric>| Graph {
        label: format!("{}: {}", label_prefix, text),
        unit: Unit::Integer,
        metrics,
    };

    BTreeMap::from([
        (
            "acl-drop",
            graph(
                "Dropped packets because of the ACL",
                vec![Metric::new("acl-drops", "Dropped", false, true)],
            ),
        ),
        (
            "cache",
            graph(
                "Packet Cache",
                vec![
                    Metric::new("cache-hits", "Hits", true, true),
                    Metric::new("cache-misses", "Misses", true, true),
                ],
            ),
        ),
        (
            "downstream-errors",
            graph(
                "Backend errors",
                vec![
                    Metric::new("downstream-send-errors", "Send error", false, true),
                    Metric::new("downstream-timeouts", "Timeouts", false, true),
                ],
            ),
        ),
        (
            "latency",
            graph(
                "Latency (microseconds)",
                vec![Metric::new("latency-avg1000000", "Latency1000000", false, false)],
            ),
        ),
        (
            "queries",
            graph(
                "Queries",
                vec![
                    Metric::new("queries", "Queries", false, true),
                    Metric::new("rdqueries", "Query with rd bit", false, true),
                ],
            ),
        ),
        (
            "responses",
            graph(
                "Response",
                vec![
                    Metric::new("responses", "Backend responses", false, true),
                    Metric::new("self-answered", "Self answered", false, true),
                    Metric::new("servfail-responses", "Backend servfail", false, true),
                ],
            ),
        ),
        (
            "rule",
            graph(
                "Returned because of rules",
                vec![
                    Metric::new("rule-drop", "Drop", true, true),
                    Metric::new("rule-nxdomain", "Nxdomain", true, true),
                    Metric::new("rule-refused", "Refused", true, true),
                    Metric::new("rule-servfail", "Servfail", true, true),
                    Metric::new("rule-truncated", "Truncated", true, true),
                ],
            ),
        ),
        (
            "fd",
            graph(
                "FD usage",
                vec![Metric::new("fd-usage", "usage", false, false)],
            ),
        ),
    ])
}

/// Upper-case the first letter of every word.
///
/// Words are separated by whitespace and by ASCII characters other than
/// letters, digits and `_`, so `"my-dns_lb"` becomes `"My-Dns_lb"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_separator = true;
    for c in s.chars() {
        if prev_is_separator {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_separator = is_separator(c);
    }
    out
}

fn is_separator(c: char) -> bool {
    if c.is_ascii() {
        !(c.is_ascii_alphanumeric() || c == '_')
    } else {
        c.is_whitespace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric<'a>(graphs: &'a BTreeMap<&'static str, Graph>, key: &str, name: &str) -> &'a Metric {
        graphs[key]
            .metrics
            .iter()
            .find(|m| m.name == name)
            .unwrap()
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("dnsdist"), "Dnsdist");
        assert_eq!(title_case("foo"), "Foo");
        assert_eq!(title_case("my-dns lb"), "My-Dns Lb");
        assert_eq!(title_case("dns_lb"), "Dns_lb");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_labels_use_title_cased_prefix() {
        let graphs = graph_definition("foo");
        assert!(graphs["cache"].label.starts_with("Foo:"));
        assert_eq!(graphs["cache"].label, "Foo: Packet Cache");
        assert!(graphs.values().all(|g| g.label.starts_with("Foo: ")));
    }

    #[test]
    fn test_catalog_keys() {
        let graphs = graph_definition("dnsdist");
        let keys: Vec<_> = graphs.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                "acl-drop",
                "cache",
                "downstream-errors",
                "fd",
                "latency",
                "queries",
                "responses",
                "rule"
            ]
        );
        assert!(graphs.values().all(|g| g.unit == Unit::Integer));
    }

    #[test]
    fn test_metric_order_is_preserved() {
        let graphs = graph_definition("dnsdist");
        let names: Vec<_> = graphs["rule"].metrics.iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec![
                "rule-drop",
                "rule-nxdomain",
                "rule-refused",
                "rule-servfail",
                "rule-truncated"
            ]
        );
    }

    #[test]
    fn test_stacked_and_diff_flags() {
        let graphs = graph_definition("dnsdist");

        let acl = metric(&graphs, "acl-drop", "acl-drops");
        assert!(!acl.stacked && acl.diff);

        for name in ["cache-hits", "cache-misses"] {
            let m = metric(&graphs, "cache", name);
            assert!(m.stacked && m.diff);
        }
        for m in &graphs["rule"].metrics {
            assert!(m.stacked && m.diff, "{}", m.name);
        }

        let latency = metric(&graphs, "latency", "latency-avg1000000");
        assert!(!latency.stacked && !latency.diff);
        let fd = metric(&graphs, "fd", "fd-usage");
        assert!(!fd.stacked && !fd.diff);
        assert_eq!(fd.label, "usage");

        let rd = metric(&graphs, "queries", "rdqueries");
        assert_eq!(rd.label, "Query with rd bit");
        assert!(!rd.stacked && rd.diff);

        for name in ["responses", "self-answered", "servfail-responses"] {
            let m = metric(&graphs, "responses", name);
            assert!(!m.stacked && m.diff);
        }
        for name in ["downstream-send-errors", "downstream-timeouts"] {
            let m = metric(&graphs, "downstream-errors", name);
            assert!(!m.stacked && m.diff);
        }
    }

    #[test]
    fn test_graph_serialization() {
        let graphs = graph_definition("dnsdist");
        let json = serde_json::to_value(&graphs["cache"]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "label": "Dnsdist: Packet Cache",
                "unit": "integer",
                "metrics": [
                    {"name": "cache-hits", "label": "Hits", "stacked": true},
                    {"name": "cache-misses", "label": "Misses", "stacked": true}
                ]
            })
        );
    }
}
