//! Noise masks from boosted weights

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Noise flags per class, with the thresholds that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseMasks {
    /// One flag per minority sample, in minority order
    pub minority: Vec<bool>,
    /// One flag per majority sample, in majority order
    pub majority: Vec<bool>,
    /// Threshold applied to minority weights
    pub th_min: f64,
    /// Threshold applied to majority weights
    pub th_maj: f64,
}

impl NoiseMasks {
    /// Number of minority samples flagged as noise
    pub fn n_noisy_minority(&self) -> usize {
        self.minority.iter().filter(|&&n| n).count()
    }

    /// Number of majority samples flagged as noise
    pub fn n_noisy_majority(&self) -> usize {
        self.majority.iter().filter(|&&n| n).count()
    }
}

/// Flag every weight strictly above `th`
pub fn noise_threshold(w: ArrayView1<f64>, th: f64) -> Vec<bool> {
    w.iter().map(|&wi| wi > th).collect()
}

/// Split boosted weights into per-class noise masks.
///
/// The minority threshold is `2 * n_maj / n²` and the majority threshold
/// `2 * n_min / n²`: each class is judged against the other's size.
pub fn detect_noise(w_min: ArrayView1<f64>, w_maj: ArrayView1<f64>) -> NoiseMasks {
    let n_min = w_min.len() as f64;
    let n_maj = w_maj.len() as f64;
    let n_samples = n_min + n_maj;

    let th_min = (2.0 * n_maj) / (n_samples * n_samples);
    let th_maj = (2.0 * n_min) / (n_samples * n_samples);

    NoiseMasks {
        minority: noise_threshold(w_min, th_min),
        majority: noise_threshold(w_maj, th_maj),
        th_min,
        th_maj,
    }
}
