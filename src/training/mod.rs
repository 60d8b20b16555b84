//! Weak learners used as reweighting probes
//!
//! The boosting stage only needs hard label predictions from a classifier
//! that honours per-sample weights. [`WeakClassifier`] is that contract;
//! [`DecisionTree`] is the default implementation.

pub mod decision_tree;

pub use decision_tree::{DecisionTree, TreeNode};

use crate::error::Result;
use ndarray::{Array1, Array2};

/// Classifier that can be fitted on weighted samples and predicts hard labels
pub trait WeakClassifier: Send + Sync {
    /// Fit on `x`/`y`, each sample contributing `sample_weight[i]`
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<i64>, sample_weight: &Array1<f64>) -> Result<()>;

    /// Predict a label for every row of `x`
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<i64>>;
}
