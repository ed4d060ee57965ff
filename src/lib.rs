//! Log anomaly detection by density clustering.
//!
//! `logclump` embeds free-text log lines, groups semantically similar ones
//! with DBSCAN under cosine distance, and reports the lines that fall in no
//! dense group as anomalies.
//!
//! - [`cluster`]: the deterministic clustering engine and partitioner
//! - [`ingest`]: raw text / JSONL to messages
//! - [`embed`]: the embedding provider seam (plus a local hashing embedder)
//! - [`pipeline`]: ties the above into a single [`Detector::detect`] call
//! - [`explain`], [`notify`]: optional follow-ups that never fail a run
//!
//! ```rust
//! use logclump::{parse_lines, Detector, DetectorConfig, HashingEmbedder};
//!
//! let raw = "GET /health ok\nGET /health ok\nGET /health ok\nsegfault in worker 3";
//! let config = DetectorConfig { min_samples: 2, ..Default::default() };
//! let embedder = HashingEmbedder::new(config.embedding_dim).unwrap();
//!
//! let report = Detector::new(config).unwrap().detect(parse_lines(raw), &embedder).unwrap();
//! assert_eq!(report.anomaly_messages(), vec!["segfault in worker 3"]);
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod embed;
pub mod error;
pub mod explain;
pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod report;

pub use cluster::{partition, Clustering, Dbscan, DbscanFit, Metric, Partition, NOISE};
pub use config::DetectorConfig;
pub use embed::{EmbeddingProvider, HashingEmbedder};
pub use error::{Error, Result};
pub use explain::{explain_anomalies, Explainer};
pub use ingest::{decode_bytes, parse_lines};
pub use notify::{build_anomaly_html, notify, NotificationSink};
pub use pipeline::Detector;
pub use report::DetectionReport;
