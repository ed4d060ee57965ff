//! Messages in, clusters and anomalies out.

use std::time::Instant;

use tracing::{debug, info};

use crate::cluster::{partition, Dbscan};
use crate::config::DetectorConfig;
use crate::embed::EmbeddingProvider;
use crate::error::{Error, Result};
use crate::report::DetectionReport;

/// Runs embedding, clustering and partitioning for a batch of messages.
///
/// Holds no state between runs; every call recomputes from scratch.
#[derive(Debug, Clone)]
pub struct Detector {
    config: DetectorConfig,
}

impl Detector {
    /// Create a detector. The configuration is validated up front.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Cluster `messages` using vectors from `provider`.
    ///
    /// An empty message list returns an empty report without calling the
    /// provider. Clustering starts only once the full embedding matrix is in
    /// hand.
    pub fn detect(
        &self,
        messages: Vec<String>,
        provider: &dyn EmbeddingProvider,
    ) -> Result<DetectionReport> {
        if messages.is_empty() {
            info!("no messages to cluster");
            return Ok(DetectionReport::default());
        }

        let started = Instant::now();
        let vectors = provider.embed(&messages, self.config.batch_size)?;
        if vectors.len() != messages.len() {
            return Err(Error::EmbeddingCountMismatch {
                expected: messages.len(),
                found: vectors.len(),
            });
        }
        debug!(
            n = vectors.len(),
            dim = provider.dimension(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "embedded messages"
        );

        let dbscan = Dbscan::new(self.config.eps, self.config.min_samples)
            .with_metric(self.config.metric);
        let labels = dbscan.fit(&vectors)?.labels;
        let partition = partition(&labels);

        info!(
            messages = messages.len(),
            clusters = partition.n_clusters(),
            anomalies = partition.n_anomalies(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "detection complete"
        );

        Ok(DetectionReport {
            messages,
            labels,
            partition,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::HashingEmbedder;
    use std::cell::Cell;

    struct Fixed {
        vectors: Vec<Vec<f32>>,
        calls: Cell<usize>,
    }

    impl EmbeddingProvider for Fixed {
        fn embed(&self, _texts: &[String], _batch_size: usize) -> Result<Vec<Vec<f32>>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.vectors.clone())
        }

        fn dimension(&self) -> usize {
            self.vectors.first().map_or(0, Vec::len)
        }
    }

    fn lines(n: usize, text: &str) -> Vec<String> {
        vec![text.to_string(); n]
    }

    #[test]
    fn empty_input_skips_provider() {
        let provider = Fixed {
            vectors: vec![],
            calls: Cell::new(0),
        };
        let report = Detector::new(DetectorConfig::default())
            .unwrap()
            .detect(Vec::new(), &provider)
            .unwrap();
        assert!(report.is_empty());
        assert!(report.partition.is_empty());
        assert_eq!(provider.calls.get(), 0);
    }

    #[test]
    fn misaligned_provider_is_an_error() {
        let provider = Fixed {
            vectors: vec![vec![1.0, 0.0]],
            calls: Cell::new(0),
        };
        let err = Detector::new(DetectorConfig::default())
            .unwrap()
            .detect(lines(2, "x"), &provider)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::EmbeddingCountMismatch {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn fixed_vectors_flow_through() {
        let provider = Fixed {
            vectors: vec![
                vec![1.0, 0.0, 0.0],
                vec![1.0, 0.0, 0.0],
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
            ],
            calls: Cell::new(0),
        };
        let config = DetectorConfig {
            min_samples: 2,
            ..Default::default()
        };
        let report = Detector::new(config)
            .unwrap()
            .detect(lines(4, "msg"), &provider)
            .unwrap();
        assert_eq!(report.labels, vec![0, 0, 0, -1]);
        assert_eq!(report.partition.anomalies, vec![3]);
    }

    #[test]
    fn hashing_embedder_isolates_the_odd_line() {
        let mut messages: Vec<String> = (0..6)
            .map(|i| format!("2025-08-01T12:00:0{i}Z INFO request ok /health"))
            .collect();
        messages.insert(3, "kernel panic: unable to mount root fs".to_string());

        let config = DetectorConfig {
            min_samples: 3,
            ..Default::default()
        };
        let embedder = HashingEmbedder::new(config.embedding_dim).unwrap();
        let report = Detector::new(config)
            .unwrap()
            .detect(messages, &embedder)
            .unwrap();

        assert_eq!(report.partition.anomalies, vec![3]);
        assert_eq!(report.partition.n_clusters(), 1);
        assert_eq!(
            report.anomaly_messages(),
            vec!["kernel panic: unable to mount root fs"]
        );
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = DetectorConfig {
            eps: -0.1,
            ..Default::default()
        };
        assert!(Detector::new(config).is_err());
    }
}
