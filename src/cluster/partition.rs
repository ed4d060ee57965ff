//! Split a label sequence into clusters and anomalies.

use indexmap::IndexMap;

use super::dbscan::NOISE;

/// Clusters and anomalies induced by a label sequence.
///
/// Every input index appears exactly once: either in one cluster or in
/// `anomalies`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Cluster id -> member indices, both in first-seen order.
    pub clusters: IndexMap<i32, Vec<usize>>,
    /// Indices labeled [`NOISE`], ascending.
    pub anomalies: Vec<usize>,
}

/// Group indices by label. Never fails; O(n).
pub fn partition(labels: &[i32]) -> Partition {
    let mut out = Partition::default();
    for (i, &label) in labels.iter().enumerate() {
        if label == NOISE {
            out.anomalies.push(i);
        } else {
            out.clusters.entry(label).or_default().push(i);
        }
    }
    out
}

impl Partition {
    /// Number of clusters (noise excluded).
    pub fn n_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Number of anomalies.
    pub fn n_anomalies(&self) -> usize {
        self.anomalies.len()
    }

    /// Total number of indices covered.
    pub fn len(&self) -> usize {
        self.anomalies.len() + self.clusters.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cluster containing `index`, or `None` if it is an anomaly or out of range.
    pub fn cluster_of(&self, index: usize) -> Option<i32> {
        self.clusters
            .iter()
            .find(|(_, members)| members.contains(&index))
            .map(|(&id, _)| id)
    }

    /// Clusters ordered largest first. Equal sizes keep discovery order.
    pub fn by_size_desc(&self) -> Vec<(i32, &[usize])> {
        let mut out: Vec<(i32, &[usize])> = self
            .clusters
            .iter()
            .map(|(&id, members)| (id, members.as_slice()))
            .collect();
        out.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        out
    }
}
