//! Detector configuration.
//!
//! # TOML Structure
//!
//! ```toml
//! eps = 0.3
//! min_samples = 3
//! batch_size = 8
//! metric = "cosine"
//! embedding_dim = 256
//! ```
//!
//! Every field is optional and falls back to its default. Environment
//! variables (`LOGCLUMP_EPS`, `LOGCLUMP_MIN_SAMPLES`, `LOGCLUMP_BATCH_SIZE`,
//! `LOGCLUMP_METRIC`) override file values via [`DetectorConfig::with_env_overrides`].

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cluster::Metric;
use crate::error::{Error, Result};

/// Parameters for one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectorConfig {
    /// Neighborhood radius (cosine distance by default).
    #[serde(default = "default_eps")]
    pub eps: f64,

    /// Minimum neighborhood size, the point itself included.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    /// Texts per embedding batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default)]
    pub metric: Metric,

    /// Vector length for the built-in hashing embedder.
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,
}

fn default_eps() -> f64 {
    0.30
}

fn default_min_samples() -> usize {
    3
}

fn default_batch_size() -> usize {
    8
}

fn default_embedding_dim() -> usize {
    256
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            eps: default_eps(),
            min_samples: default_min_samples(),
            batch_size: default_batch_size(),
            metric: Metric::default(),
            embedding_dim: default_embedding_dim(),
        }
    }
}

impl DetectorConfig {
    /// Load from a TOML file. The result is not validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&contents)
            .map_err(|e| Error::Config(format!("in '{}': {}", path.display(), e)))
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(format!("failed to parse TOML: {e}")))
    }

    /// Apply `LOGCLUMP_*` environment overrides. Unparseable values are
    /// ignored with a warning.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = lookup("LOGCLUMP_EPS") {
            match val.parse::<f64>() {
                Ok(eps) => self.eps = eps,
                Err(_) => warn!(value = %val, "ignoring invalid LOGCLUMP_EPS"),
            }
        }
        if let Some(val) = lookup("LOGCLUMP_MIN_SAMPLES") {
            match val.parse::<usize>() {
                Ok(n) => self.min_samples = n,
                Err(_) => warn!(value = %val, "ignoring invalid LOGCLUMP_MIN_SAMPLES"),
            }
        }
        if let Some(val) = lookup("LOGCLUMP_BATCH_SIZE") {
            match val.parse::<usize>() {
                Ok(n) => self.batch_size = n,
                Err(_) => warn!(value = %val, "ignoring invalid LOGCLUMP_BATCH_SIZE"),
            }
        }
        if let Some(val) = lookup("LOGCLUMP_METRIC") {
            match val.parse::<Metric>() {
                Ok(m) => self.metric = m,
                Err(_) => warn!(value = %val, "ignoring invalid LOGCLUMP_METRIC"),
            }
        }
        self
    }

    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        if !self.eps.is_finite() || self.eps <= 0.0 {
            return Err(Error::Config(format!(
                "eps must be a positive finite number, got {}",
                self.eps
            )));
        }
        if self.min_samples == 0 {
            return Err(Error::Config("min_samples must be >= 1".to_string()));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be >= 1".to_string()));
        }
        if self.embedding_dim == 0 {
            return Err(Error::Config("embedding_dim must be >= 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let c = DetectorConfig::default();
        assert_eq!(c.eps, 0.30);
        assert_eq!(c.min_samples, 3);
        assert_eq!(c.batch_size, 8);
        assert_eq!(c.metric, Metric::Cosine);
        c.validate().unwrap();
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c = DetectorConfig::from_toml_str("eps = 0.15\nmetric = \"euclidean\"").unwrap();
        assert_eq!(c.eps, 0.15);
        assert_eq!(c.metric, Metric::Euclidean);
        assert_eq!(c.min_samples, 3);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(DetectorConfig::from_toml_str("epsilon = 0.2").is_err());
    }

    #[test]
    fn from_file_roundtrip() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "min_samples = 5\nbatch_size = 16").unwrap();
        let c = DetectorConfig::from_file(f.path()).unwrap();
        assert_eq!(c.min_samples, 5);
        assert_eq!(c.batch_size, 16);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = DetectorConfig::from_file("/nonexistent/logclump.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn overrides_apply_and_bad_values_are_ignored() {
        let vars: HashMap<&str, &str> = [
            ("LOGCLUMP_EPS", "0.2"),
            ("LOGCLUMP_MIN_SAMPLES", "not-a-number"),
            ("LOGCLUMP_METRIC", "l2"),
        ]
        .into_iter()
        .collect();
        let c = DetectorConfig::default()
            .with_overrides_from(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(c.eps, 0.2);
        assert_eq!(c.min_samples, 3);
        assert_eq!(c.metric, Metric::Euclidean);
    }

    #[test]
    fn validation_catches_bad_values() {
        let bad = [
            DetectorConfig {
                eps: 0.0,
                ..Default::default()
            },
            DetectorConfig {
                eps: f64::NAN,
                ..Default::default()
            },
            DetectorConfig {
                min_samples: 0,
                ..Default::default()
            },
            DetectorConfig {
                batch_size: 0,
                ..Default::default()
            },
            DetectorConfig {
                embedding_dim: 0,
                ..Default::default()
            },
        ];
        for c in bad {
            assert!(matches!(c.validate(), Err(Error::Config(_))));
        }
    }
}
