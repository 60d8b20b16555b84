//! Boosted sample weights
//!
//! An AdaBoost-style reweighting loop whose only product is the final weight
//! distribution: samples the weak learner keeps getting wrong accumulate mass
//! and are later treated as noise.

use crate::error::{ResampleError, Result};
use crate::training::WeakClassifier;
use ndarray::{Array1, Array2};
use tracing::debug;

/// Runs `n_iters` reweighting rounds of a weak classifier
#[derive(Debug, Clone, Copy)]
pub struct WeightBooster {
    n_iters: usize,
}

impl WeightBooster {
    pub fn new(n_iters: usize) -> Self {
        Self { n_iters }
    }

    /// Per-sample weights over the full dataset.
    ///
    /// Sums to 1.0, except when a round classifies every sample correctly:
    /// then the all-zero vector is returned (nothing is noise). A round that
    /// misclassifies every sample leaves the weights as they are.
    pub fn run<C: WeakClassifier>(
        &self,
        classifier: &mut C,
        x: &Array2<f64>,
        y: &Array1<i64>,
    ) -> Result<Array1<f64>> {
        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(ResampleError::ValidationError(
                "Boosting needs at least one sample".to_string(),
            ));
        }

        let mut weights = Array1::from_elem(n_samples, 1.0 / n_samples as f64);

        for round in 0..self.n_iters {
            classifier.fit(x, y, &weights)?;
            let predicted = classifier.predict(x)?;

            let wrong: Vec<bool> = predicted.iter().zip(y.iter()).map(|(p, t)| p != t).collect();
            let w_error: f64 = weights
                .iter()
                .zip(&wrong)
                .filter(|(_, &miss)| miss)
                .map(|(w, _)| w)
                .sum();

            if w_error == 0.0 {
                debug!(round, "weak learner fits every sample, no sample is noise");
                return Ok(Array1::zeros(n_samples));
            }
            if wrong.iter().all(|&miss| miss) {
                // Every weight would be scaled by the same factor, which
                // renormalisation cancels
                debug!(round, "weak learner misses every sample, weights unchanged");
                continue;
            }

            let alpha = 0.5 * ((1.0 - w_error) / w_error).ln();
            let boost = alpha.exp();
            for (w, &miss) in weights.iter_mut().zip(&wrong) {
                if miss {
                    *w *= boost;
                }
            }

            let total = weights.sum();
            if !(total.is_finite() && total > 0.0) {
                return Err(ResampleError::ComputationError(format!(
                    "weight normalisation failed in round {} (weighted error {})",
                    round, w_error
                )));
            }
            weights /= total;
        }

        Ok(weights)
    }
}
