//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points by neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Automatically determines the number of clusters
//! - Identifies noise points (outliers)
//!
//! ## Core Concepts
//!
//! - **eps**: Maximum distance between two points to be neighbors (inclusive).
//! - **min_samples**: Minimum neighborhood size, *including the point itself*,
//!   for a point to be "core".
//! - **Core point**: Has at least `min_samples` points within eps.
//! - **Border point**: Within eps of a core point but not core itself.
//! - **Noise point**: Neither core nor border. Labeled [`NOISE`].
//!
//! ## Labeling
//!
//! Points are visited in input order. Every unvisited core point opens a new
//! cluster with the next id (0, 1, 2, ...), which is then grown breadth-first
//! through the neighborhoods of the core points it reaches. A border point
//! belongs to the first cluster that reaches it; later clusters never steal it.
//! Given the same vectors in the same order and the same parameters, labels
//! are identical across runs.
//!
//! Cluster ids only record discovery order. They carry no meaning across
//! different parameters or inputs; compare partitions, not ids.
//!
//! ## Complexity
//!
//! - **Time**: O(n² · d) for the exact neighbor search.
//! - **Space**: O(n · d + n²) in the worst case (every point near every other).
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use std::collections::VecDeque;

use tracing::debug;

use super::distance::Metric;
use super::neighbors::Neighborhoods;
use super::traits::Clustering;
use super::validate;
use crate::error::{Error, Result};

/// Label assigned to noise (anomalous) points.
pub const NOISE: i32 = -1;

/// Returns `true` if `label` marks a noise point.
#[inline]
pub fn is_noise(label: i32) -> bool {
    label == NOISE
}

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Neighborhood radius under `metric`.
    eps: f64,
    /// Minimum neighborhood size (self included) for a core point.
    min_samples: usize,
    metric: Metric,
}

/// Result of a DBSCAN fit.
#[derive(Debug, Clone, PartialEq)]
pub struct DbscanFit {
    /// One label per input point: a cluster id, or [`NOISE`].
    pub labels: Vec<i32>,
    /// `core[i]` is `true` if point `i` is a core point.
    pub core: Vec<bool>,
    /// Number of clusters discovered.
    pub n_clusters: usize,
}

impl DbscanFit {
    /// Indices of core points, ascending.
    pub fn core_sample_indices(&self) -> Vec<usize> {
        self.core
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| c.then_some(i))
            .collect()
    }

    /// Number of points labeled noise.
    pub fn n_noise(&self) -> usize {
        self.labels.iter().filter(|&&l| is_noise(l)).count()
    }
}

impl Dbscan {
    /// Create a new DBSCAN clusterer using cosine distance.
    ///
    /// # Arguments
    ///
    /// * `eps` - Maximum distance between two points to be neighbors.
    /// * `min_samples` - Minimum neighborhood size (self included) of a core point.
    ///
    /// # Typical Values
    ///
    /// For sentence embeddings under cosine distance, `eps` in 0.1..0.4 and
    /// `min_samples` of 2..5 are reasonable starting points.
    pub fn new(eps: f64, min_samples: usize) -> Self {
        Self {
            eps,
            min_samples,
            metric: Metric::Cosine,
        }
    }

    /// Set eps (neighborhood radius).
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Set minimum neighborhood size for core classification.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Set the distance measure.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Configured eps.
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// Configured minimum neighborhood size.
    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Configured distance measure.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    fn check_params(&self) -> Result<()> {
        if !self.eps.is_finite() || self.eps <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "eps",
                message: "must be a positive finite number",
            });
        }

        if self.min_samples == 0 {
            return Err(Error::InvalidParameter {
                name: "min_samples",
                message: "must be at least 1",
            });
        }

        Ok(())
    }

    /// Cluster `data`, returning labels and core-point information.
    ///
    /// Empty input yields an empty fit. Ragged rows, zero-length rows and
    /// non-finite components are rejected.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<DbscanFit> {
        self.check_params()?;
        validate::matrix(data)?;

        let n = data.len();
        if n == 0 {
            return Ok(DbscanFit {
                labels: Vec::new(),
                core: Vec::new(),
                n_clusters: 0,
            });
        }

        let neighborhoods = Neighborhoods::compute(data, self.metric, self.eps);
        let core: Vec<bool> = (0..n)
            .map(|i| neighborhoods.of(i).len() >= self.min_samples)
            .collect();

        let mut labels = vec![NOISE; n];
        let mut visited = vec![false; n];
        let mut cluster_id: i32 = 0;

        for point_idx in 0..n {
            if visited[point_idx] {
                continue;
            }
            visited[point_idx] = true;

            if !core[point_idx] {
                // Provisional: may still be claimed as a border point.
                continue;
            }

            expand_cluster(
                &neighborhoods,
                &core,
                point_idx,
                cluster_id,
                &mut labels,
                &mut visited,
            );
            cluster_id += 1;
        }

        let fit = DbscanFit {
            labels,
            core,
            n_clusters: cluster_id as usize,
        };

        debug!(
            n,
            eps = self.eps,
            min_samples = self.min_samples,
            metric = %self.metric,
            n_clusters = fit.n_clusters,
            n_noise = fit.n_noise(),
            "dbscan fit complete"
        );

        Ok(fit)
    }

    /// Fit and predict, returning labels where noise is marked as `None`.
    pub fn fit_predict_with_noise(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>> {
        Ok(self
            .fit(data)?
            .labels
            .into_iter()
            .map(|l| usize::try_from(l).ok())
            .collect())
    }
}

/// Grow cluster `cluster_id` breadth-first from core point `seed`.
fn expand_cluster(
    neighborhoods: &Neighborhoods,
    core: &[bool],
    seed: usize,
    cluster_id: i32,
    labels: &mut [i32],
    visited: &mut [bool],
) {
    labels[seed] = cluster_id;

    let mut frontier: VecDeque<usize> = neighborhoods.of(seed).iter().copied().collect();

    while let Some(idx) = frontier.pop_front() {
        // Label before the visited check so that points provisionally marked
        // as noise are reclaimed as border points. Points already owned by a
        // cluster keep it.
        if labels[idx] == NOISE {
            labels[idx] = cluster_id;
        }

        if visited[idx] {
            continue;
        }
        visited[idx] = true;

        if core[idx] {
            // Unvisited points are always unlabeled, so this also picks up
            // visited noise that only this core point can reach.
            frontier.extend(
                neighborhoods
                    .of(idx)
                    .iter()
                    .copied()
                    .filter(|&j| labels[j] == NOISE),
            );
        }
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.3, 3)
    }
}

impl Clustering for Dbscan {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<i32>> {
        Ok(self.fit(data)?.labels)
    }

    /// DBSCAN discovers clusters dynamically, so this returns 0.
    ///
    /// To get the actual number of clusters, use [`Dbscan::fit`].
    fn n_clusters(&self) -> usize {
        0
    }
}
