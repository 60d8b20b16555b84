//! Synthetic minority oversampling
//!
//! Provides:
//! - SMOTEWB (noise-aware, boosting-guided SMOTE)
//! - SMOTE (plain neighbor interpolation, also the SMOTEWB fallback)

mod smote;
pub mod smotewb;

pub use smote::SMOTE;
pub use smotewb::{Category, SmoteWB, SmoteWBAnalysis, SmoteWBConfig};

use crate::error::{ResampleError, Result};
use ndarray::{concatenate, Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Why a sampler returned its input unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnchangedReason {
    /// Requested number of synthetic samples is zero
    NothingToSample,
    /// Fewer than two classes present
    SingleClass,
    /// Fewer than two minority samples
    TooFewMinority,
    /// Generation produced no rows
    NoSamplesGenerated,
}

/// Which path produced a [`ResampleResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResampleOutcome {
    /// Synthetic rows were appended by the sampler itself
    Oversampled,
    /// SMOTEWB found no eligible minority sample and delegated to plain SMOTE
    Fallback,
    /// Input returned as is
    Unchanged(UnchangedReason),
}

/// Result of resampling
#[derive(Debug, Clone)]
pub struct ResampleResult {
    /// Original rows followed by synthetic rows
    pub x: Array2<f64>,
    /// Labels aligned with `x`
    pub y: Array1<i64>,
    /// Number of synthetic rows appended
    pub n_synthetic: usize,
    /// Path taken
    pub outcome: ResampleOutcome,
}

impl ResampleResult {
    /// Copy of the input, no synthetic rows
    pub fn unchanged(x: &Array2<f64>, y: &Array1<i64>, reason: UnchangedReason) -> Self {
        Self {
            x: x.clone(),
            y: y.clone(),
            n_synthetic: 0,
            outcome: ResampleOutcome::Unchanged(reason),
        }
    }

    /// Append `synthetic` rows, all labelled `label`, after the original data
    pub fn extended(
        x: &Array2<f64>,
        y: &Array1<i64>,
        synthetic: &Array2<f64>,
        label: i64,
    ) -> Result<Self> {
        if synthetic.ncols() != x.ncols() {
            return Err(ResampleError::ShapeError {
                expected: format!("{} features", x.ncols()),
                actual: format!("{} features", synthetic.ncols()),
            });
        }
        let x_out = concatenate(Axis(0), &[x.view(), synthetic.view()])?;
        let y_out = concatenate(
            Axis(0),
            &[y.view(), Array1::from_elem(synthetic.nrows(), label).view()],
        )?;
        Ok(Self {
            x: x_out,
            y: y_out,
            n_synthetic: synthetic.nrows(),
            outcome: ResampleOutcome::Oversampled,
        })
    }
}

/// Capability shared by every oversampler: augment a labelled dataset
pub trait Sampler: Send + Sync {
    /// Return the original rows followed by synthetic minority rows
    fn sample(&self, x: &Array2<f64>, y: &Array1<i64>) -> Result<ResampleResult>;
}

/// Minority/majority split of a binary label vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStats {
    pub min_label: i64,
    pub maj_label: i64,
    pub n_min: usize,
    pub n_maj: usize,
}

impl ClassStats {
    /// Binary statistics of `y`; `None` when fewer than two classes are present.
    ///
    /// On equal counts the smaller label is taken as minority.
    pub fn from_labels(y: &Array1<i64>) -> Result<Option<Self>> {
        let counts = class_counts(y);
        if counts.len() > 2 {
            return Err(ResampleError::ValidationError(format!(
                "Expected a binary label vector, found {} classes",
                counts.len()
            )));
        }
        if counts.len() < 2 {
            return Ok(None);
        }

        // BTreeMap iterates in ascending label order
        let mut it = counts.into_iter();
        let (Some((a, n_a)), Some((b, n_b))) = (it.next(), it.next()) else {
            return Ok(None);
        };
        let stats = if n_b < n_a {
            Self { min_label: b, maj_label: a, n_min: n_b, n_maj: n_a }
        } else {
            Self { min_label: a, maj_label: b, n_min: n_a, n_maj: n_b }
        };
        Ok(Some(stats))
    }

    /// Total sample count
    pub fn n_samples(&self) -> usize {
        self.n_min + self.n_maj
    }

    /// Number of synthetic samples for a target balance `proportion`:
    /// floor((n_maj - n_min) * proportion)
    pub fn n_to_sample(&self, proportion: f64) -> usize {
        let gap = self.n_maj.saturating_sub(self.n_min) as f64;
        (gap * proportion).max(0.0).floor() as usize
    }
}

/// Checks shared by all samplers before any work is done
pub(crate) fn validate_dataset(x: &Array2<f64>, y: &Array1<i64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(ResampleError::ShapeError {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }
    if x.ncols() == 0 && x.nrows() > 0 {
        return Err(ResampleError::ValidationError(
            "Dataset has no feature columns".to_string(),
        ));
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(ResampleError::ValidationError(
            "Features must be finite (no NaN or infinity)".to_string(),
        ));
    }
    Ok(())
}

/// Class statistics, or the unchanged result to return early
pub(crate) fn resolve_classes(
    sampler: &str,
    x: &Array2<f64>,
    y: &Array1<i64>,
) -> Result<std::result::Result<ClassStats, ResampleResult>> {
    validate_dataset(x, y)?;

    let Some(stats) = ClassStats::from_labels(y)? else {
        warn!(sampler, "only one class present, returning the data unchanged");
        return Ok(Err(ResampleResult::unchanged(x, y, UnchangedReason::SingleClass)));
    };

    if stats.n_min < 2 {
        warn!(
            sampler,
            n_min = stats.n_min,
            "not enough minority samples to oversample, returning the data unchanged"
        );
        return Ok(Err(ResampleResult::unchanged(x, y, UnchangedReason::TooFewMinority)));
    }

    Ok(Ok(stats))
}

/// Positions in `y` holding `label`, ascending
pub(crate) fn indices_with_label(y: &Array1<i64>, label: i64) -> Vec<usize> {
    y.iter()
        .enumerate()
        .filter(|(_, &l)| l == label)
        .map(|(i, _)| i)
        .collect()
}

/// Rows of `x` whose label equals `label`, in original order
pub(crate) fn rows_with_label(x: &Array2<f64>, y: &Array1<i64>, label: i64) -> Array2<f64> {
    x.select(Axis(0), &indices_with_label(y, label))
}

/// Get class distribution
pub fn class_counts(y: &Array1<i64>) -> BTreeMap<i64, usize> {
    let mut counts = BTreeMap::new();
    for &label in y.iter() {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}
