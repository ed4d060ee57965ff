//! Exact eps-neighborhoods by brute-force pairwise comparison.
//!
//! Each pair is measured once and recorded in both rows, so every row comes
//! out sorted by index and contains the point itself. Worst case memory is
//! O(n²) when every point is within eps of every other.

use super::distance::{self, Metric};

pub(crate) struct Neighborhoods {
    rows: Vec<Vec<usize>>,
}

impl Neighborhoods {
    /// Compute all eps-neighborhoods. `data` must already be validated.
    pub(crate) fn compute(data: &[Vec<f32>], metric: Metric, eps: f64) -> Self {
        let n = data.len();
        let mut rows: Vec<Vec<usize>> = vec![Vec::new(); n];

        let norms: Vec<f64> = match metric {
            Metric::Cosine => data.iter().map(|p| distance::norm(p)).collect(),
            Metric::Euclidean => Vec::new(),
        };

        let dist = |i: usize, j: usize| -> f64 {
            match metric {
                Metric::Cosine => {
                    let sim = distance::cosine_similarity_with_norms(
                        &data[i], &data[j], norms[i], norms[j],
                    );
                    (1.0 - sim).clamp(0.0, 2.0)
                }
                Metric::Euclidean => distance::euclidean(&data[i], &data[j]),
            }
        };

        for i in 0..n {
            // dist(i, i) is 0 by definition, even for a zero vector.
            rows[i].push(i);
            for j in (i + 1)..n {
                if dist(i, j) <= eps {
                    rows[i].push(j);
                    rows[j].push(i);
                }
            }
        }

        Self { rows }
    }

    #[inline]
    pub(crate) fn of(&self, i: usize) -> &[usize] {
        &self.rows[i]
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }
}
