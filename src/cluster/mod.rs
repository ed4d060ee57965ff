//! Density clustering of embedding vectors.
//!
//! Log lines that mean the same thing land close together once embedded.
//! DBSCAN turns that into a partition: dense groups become clusters, and
//! points that are not reachable from any dense group are noise. For log
//! triage the noise set is the interesting output: rare messages that look
//! like nothing else in the batch.
//!
//! ## Distance
//!
//! The default measure is cosine distance, `1 - cos(a, b)`, which ignores
//! vector magnitude. A zero vector has similarity 0 with everything (distance
//! 1), and distance 0 to itself. Euclidean distance is available through
//! [`Metric::Euclidean`].
//!
//! ## Pipeline
//!
//! ```text
//! vectors ──► Dbscan::fit_predict ──► labels ──► partition ──► { clusters, anomalies }
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use logclump::cluster::{partition, Clustering, Dbscan, NOISE};
//!
//! let data = vec![
//!     vec![1.0, 0.0, 0.0],
//!     vec![1.0, 0.0, 0.0],
//!     vec![1.0, 0.0, 0.0],
//!     vec![0.0, 1.0, 0.0],
//! ];
//!
//! let labels = Dbscan::new(0.3, 2).fit_predict(&data).unwrap();
//! assert_eq!(labels, vec![0, 0, 0, NOISE]);
//!
//! let p = partition(&labels);
//! assert_eq!(p.clusters[&0], vec![0, 1, 2]);
//! assert_eq!(p.anomalies, vec![3]);
//! ```

mod dbscan;
mod distance;
mod neighbors;
mod partition;
mod traits;
mod validate;

pub use dbscan::{is_noise, Dbscan, DbscanFit, NOISE};
pub use distance::{cosine_distance, cosine_similarity, euclidean, Metric};
pub use partition::{partition, Partition};
pub use traits::Clustering;
