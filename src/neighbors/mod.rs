//! Nearest-neighbor search
//!
//! Neighbor rankings drive both the SMOTEWB neighborhood categories and the
//! plain SMOTE fallback. Queries return indices sorted by ascending distance,
//! ties broken by index, so rankings are reproducible.

mod brute_force;

pub use brute_force::BruteForceIndex;

use crate::error::{ResampleError, Result};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Distance metric for neighbor search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Euclidean distance (L2)
    Euclidean,
    /// Manhattan distance (L1)
    Manhattan,
    /// Minkowski distance with parameter p
    Minkowski(f64),
    /// sqrt((a - b)ᵀ M (a - b)) with a metric tensor M
    Mahalanobis,
}

impl Default for DistanceMetric {
    fn default() -> Self {
        Self::Euclidean
    }
}

/// Options for neighbor calculations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborParams {
    /// Number of neighbors used by plain SMOTE
    pub n_neighbors: usize,
    /// Distance metric
    pub metric: DistanceMetric,
    /// Metric tensor for [`DistanceMetric::Mahalanobis`], d×d
    pub metric_tensor: Option<Array2<f64>>,
}

impl Default for NeighborParams {
    fn default() -> Self {
        Self {
            n_neighbors: 5,
            metric: DistanceMetric::Euclidean,
            metric_tensor: None,
        }
    }
}

impl NeighborParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_n_neighbors(mut self, k: usize) -> Self {
        self.n_neighbors = k;
        self
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Use a learned or precomputed metric tensor; switches to Mahalanobis
    pub fn with_metric_tensor(mut self, tensor: Array2<f64>) -> Self {
        self.metric = DistanceMetric::Mahalanobis;
        self.metric_tensor = Some(tensor);
        self
    }

    /// Check the options that can be checked without data
    pub fn validate(&self) -> Result<()> {
        if self.n_neighbors < 1 {
            return Err(ResampleError::invalid_parameter(
                "n_neighbors",
                self.n_neighbors,
                "must be at least 1",
            ));
        }
        match self.metric {
            DistanceMetric::Minkowski(p) if !(p.is_finite() && p >= 1.0) => {
                return Err(ResampleError::invalid_parameter(
                    "metric",
                    format!("Minkowski({})", p),
                    "p must be finite and at least 1",
                ));
            }
            DistanceMetric::Mahalanobis => match &self.metric_tensor {
                None => {
                    return Err(ResampleError::invalid_parameter(
                        "metric_tensor",
                        "None",
                        "Mahalanobis metric needs a metric tensor",
                    ));
                }
                Some(m) if m.nrows() != m.ncols() || m.iter().any(|v| !v.is_finite()) => {
                    return Err(ResampleError::invalid_parameter(
                        "metric_tensor",
                        format!("{}x{}", m.nrows(), m.ncols()),
                        "must be a square matrix of finite values",
                    ));
                }
                Some(_) => {}
            },
            _ => {}
        }
        Ok(())
    }
}

/// Index answering k-nearest-neighbor queries against a fitted point set
pub trait NeighborIndex: Send + Sync {
    /// Store the reference points
    fn fit(&mut self, x: &Array2<f64>) -> Result<()>;

    /// For each query row, indices of the `k` nearest fitted rows, nearest first.
    ///
    /// `k` is truncated to the number of fitted rows. A query that is itself a
    /// fitted row gets its own index first (distance zero, lowest index among
    /// exact duplicates).
    fn kneighbors(&self, query: &Array2<f64>, k: usize) -> Result<Array2<usize>>;
}

/// Compute distance between two points using the specified metric
pub(crate) fn compute_distance(
    a: ArrayView1<f64>,
    b: ArrayView1<f64>,
    metric: DistanceMetric,
    tensor: Option<&Array2<f64>>,
) -> f64 {
    match metric {
        DistanceMetric::Euclidean => a
            .iter()
            .zip(b.iter())
            .map(|(ai, bi)| {
                let d = ai - bi;
                d * d
            })
            .sum::<f64>()
            .sqrt(),
        DistanceMetric::Manhattan => a.iter().zip(b.iter()).map(|(ai, bi)| (ai - bi).abs()).sum(),
        DistanceMetric::Minkowski(p) => a
            .iter()
            .zip(b.iter())
            .map(|(ai, bi)| (ai - bi).abs().powf(p))
            .sum::<f64>()
            .powf(1.0 / p),
        DistanceMetric::Mahalanobis => match tensor {
            Some(m) => {
                let diff = &a - &b;
                m.dot(&diff).dot(&diff).max(0.0).sqrt()
            }
            None => compute_distance(a, b, DistanceMetric::Euclidean, None),
        },
    }
}
