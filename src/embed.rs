//! Embedding providers.
//!
//! The clustering engine only needs "one fixed-length vector per text, in
//! order". Real deployments plug a sentence-embedding model in behind
//! [`EmbeddingProvider`]; [`HashingEmbedder`] is a dependency-free stand-in
//! that is good enough to separate templated log lines from one-off ones.

use tracing::debug;

use crate::error::{Error, Result};

/// Produces one embedding per input text, index-aligned with the input.
pub trait EmbeddingProvider {
    /// Embed `texts`, processing at most `batch_size` texts at a time.
    ///
    /// Must return exactly `texts.len()` vectors of [`dimension`](Self::dimension)
    /// components each; empty input yields empty output.
    fn embed(&self, texts: &[String], batch_size: usize) -> Result<Vec<Vec<f32>>>;

    /// Length of every returned vector.
    fn dimension(&self) -> usize;
}

/// Bag-of-words feature hashing with signed buckets.
///
/// Tokens are lowercase alphanumeric runs with every digit folded to `0`,
/// so request ids and timestamps collapse onto the same features. Output
/// vectors are L2-normalized; a text with no tokens maps to the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::InvalidParameter {
                name: "embedding_dim",
                message: "must be at least 1",
            });
        }
        Ok(Self { dimension })
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimension];
        for token in tokens(text) {
            let h = fnv1a(token.as_bytes());
            let bucket = (h % self.dimension as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn embed(&self, texts: &[String], batch_size: usize) -> Result<Vec<Vec<f32>>> {
        if batch_size == 0 {
            return Err(Error::InvalidParameter {
                name: "batch_size",
                message: "must be at least 1",
            });
        }

        let mut out = Vec::with_capacity(texts.len());
        for (batch_idx, batch) in texts.chunks(batch_size).enumerate() {
            debug!(batch = batch_idx, size = batch.len(), "embedding batch");
            out.extend(batch.iter().map(|t| self.embed_one(t)));
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.chars()
                .flat_map(char::to_lowercase)
                .map(|c| if c.is_numeric() { '0' } else { c })
                .collect()
        })
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET, |h, &b| (h ^ u64::from(b)).wrapping_mul(PRIME))
}
