//! Detection results and their presentation-side views.

use std::io::Write;

use crate::cluster::Partition;
use crate::error::Result;

/// Messages shown per cluster unless the caller asks otherwise.
pub const DEFAULT_CLUSTER_SAMPLE: usize = 10;

/// Outcome of one detection run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionReport {
    /// Input messages, in input order.
    pub messages: Vec<String>,
    /// One label per message; `-1` marks an anomaly.
    pub labels: Vec<i32>,
    pub partition: Partition,
}

/// A cluster as shown to an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSummary<'a> {
    pub id: i32,
    pub size: usize,
    /// The first few member messages, in input order.
    pub samples: Vec<&'a str>,
}

impl DetectionReport {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Anomalous messages, in input order.
    pub fn anomaly_messages(&self) -> Vec<&str> {
        self.partition
            .anomalies
            .iter()
            .map(|&i| self.messages[i].as_str())
            .collect()
    }

    /// Clusters largest first, each with up to `sample` messages.
    pub fn cluster_summaries(&self, sample: usize) -> Vec<ClusterSummary<'_>> {
        self.partition
            .by_size_desc()
            .into_iter()
            .map(|(id, members)| ClusterSummary {
                id,
                size: members.len(),
                samples: members
                    .iter()
                    .take(sample)
                    .map(|&i| self.messages[i].as_str())
                    .collect(),
            })
            .collect()
    }

    /// One-line summary, e.g. `clusters: 3 | anomalies: 2`.
    pub fn headline(&self) -> String {
        format!(
            "clusters: {} | anomalies: {}",
            self.partition.n_clusters(),
            self.partition.n_anomalies()
        )
    }

    /// Write a `text,label` CSV, one row per message.
    pub fn write_csv<W: Write>(&self, mut w: W) -> Result<()> {
        writeln!(w, "text,label")?;
        for (text, label) in self.messages.iter().zip(&self.labels) {
            writeln!(w, "{},{}", csv_field(text), label)?;
        }
        w.flush()?;
        Ok(())
    }
}

fn csv_field(s: &str) -> std::borrow::Cow<'_, str> {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\"")).into()
    } else {
        s.into()
    }
}
