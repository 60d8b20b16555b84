//! Weighted decision tree classifier
//!
//! CART with Gini impurity computed on sample weights, so it can serve as the
//! weak learner of a boosting loop.

use crate::error::{ResampleError, Result};
use crate::training::WeakClassifier;
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node with predicted label
    Leaf {
        label: i64,
        n_samples: usize,
    },
    /// Internal node with split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        impurity: f64,
    },
}

/// Candidate split found for one feature
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Weighted classification tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Tree root
    root: Option<TreeNode>,
    /// Maximum depth
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Number of features seen during fit
    n_features: usize,
    /// Sorted distinct labels seen during fit
    classes: Vec<i64>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new_classifier()
    }
}

impl DecisionTree {
    /// Create a new unconstrained classifier tree
    pub fn new_classifier() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            n_features: 0,
            classes: Vec::new(),
        }
    }

    /// Deep tree used as the boosting probe: depth 30, at least 3 samples to split
    pub fn weak_learner() -> Self {
        Self::new_classifier()
            .with_max_depth(30)
            .with_min_samples_split(3)
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    fn validate_inputs(x: &Array2<f64>, y: &Array1<i64>, sample_weight: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(ResampleError::ValidationError(
                "Cannot fit a tree on zero samples".to_string(),
            ));
        }
        if y.len() != n_samples {
            return Err(ResampleError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if sample_weight.len() != n_samples {
            return Err(ResampleError::ShapeError {
                expected: format!("sample_weight length = {}", n_samples),
                actual: format!("sample_weight length = {}", sample_weight.len()),
            });
        }
        if sample_weight.iter().any(|&w| !w.is_finite() || w < 0.0) {
            return Err(ResampleError::ValidationError(
                "Sample weights must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        class_of: &[usize],
        weights: &Array1<f64>,
        indices: &[usize],
        depth: usize,
    ) -> TreeNode {
        let n_samples = indices.len();
        let class_weights = self.class_weights(class_of, weights, indices);
        let impurity = gini(&class_weights);

        let should_stop = n_samples < self.min_samples_split
            || n_samples < 2 * self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
            || impurity <= f64::EPSILON;

        if should_stop {
            return self.leaf(&class_weights, n_samples);
        }

        let Some(best) = self.find_best_split(x, class_of, weights, indices, impurity) else {
            return self.leaf(&class_weights, n_samples);
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, best.feature_idx]] <= best.threshold);

        if left_indices.len() < self.min_samples_leaf || right_indices.len() < self.min_samples_leaf {
            return self.leaf(&class_weights, n_samples);
        }

        let left = Box::new(self.build_tree(x, class_of, weights, &left_indices, depth + 1));
        let right = Box::new(self.build_tree(x, class_of, weights, &right_indices, depth + 1));

        TreeNode::Split {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            left,
            right,
            n_samples,
            impurity,
        }
    }

    fn class_weights(&self, class_of: &[usize], weights: &Array1<f64>, indices: &[usize]) -> Vec<f64> {
        let mut totals = vec![0.0; self.classes.len()];
        for &i in indices {
            totals[class_of[i]] += weights[i];
        }
        totals
    }

    fn leaf(&self, class_weights: &[f64], n_samples: usize) -> TreeNode {
        // Ties go to the smaller label
        let mut best = 0;
        for (c, &w) in class_weights.iter().enumerate() {
            if w > class_weights[best] {
                best = c;
            }
        }
        TreeNode::Leaf {
            label: self.classes[best],
            n_samples,
        }
    }

    fn find_best_split(
        &self,
        x: &Array2<f64>,
        class_of: &[usize],
        weights: &Array1<f64>,
        indices: &[usize],
        parent_impurity: f64,
    ) -> Option<SplitCandidate> {
        let n_classes = self.classes.len();
        let min_leaf = self.min_samples_leaf;
        let total = self.class_weights(class_of, weights, indices);
        let total_weight: f64 = total.iter().sum();
        if total_weight <= 0.0 {
            return None;
        }

        // Each feature is scanned independently; results come back in feature order
        let per_feature: Vec<Option<SplitCandidate>> = (0..x.ncols())
            .into_par_iter()
            .map(|feature_idx| {
                let mut order: Vec<usize> = indices.to_vec();
                order.sort_by(|&a, &b| {
                    x[[a, feature_idx]]
                        .partial_cmp(&x[[b, feature_idx]])
                        .unwrap_or(Ordering::Equal)
                        .then(a.cmp(&b))
                });

                let mut left = vec![0.0; n_classes];
                let mut best: Option<SplitCandidate> = None;
                let n = order.len();

                for pos in 0..n - 1 {
                    let i = order[pos];
                    left[class_of[i]] += weights[i];

                    let left_count = pos + 1;
                    let right_count = n - left_count;
                    if left_count < min_leaf || right_count < min_leaf {
                        continue;
                    }

                    let current = x[[i, feature_idx]];
                    let next = x[[order[pos + 1], feature_idx]];
                    if !(current < next) {
                        continue;
                    }

                    let right: Vec<f64> = total.iter().zip(&left).map(|(t, l)| t - l).collect();
                    let left_weight: f64 = left.iter().sum();
                    let right_weight = total_weight - left_weight;

                    let child_impurity =
                        (left_weight * gini(&left) + right_weight * gini(&right)) / total_weight;
                    let gain = parent_impurity - child_impurity;

                    if best.map_or(true, |b| gain > b.gain) {
                        let mut threshold = current + (next - current) / 2.0;
                        if threshold >= next {
                            threshold = current;
                        }
                        best = Some(SplitCandidate { feature_idx, threshold, gain });
                    }
                }

                best
            })
            .collect();

        // First feature with the strictly largest gain wins
        per_feature.into_iter().flatten().fold(None, |acc, candidate| match acc {
            Some(current) if candidate.gain <= current.gain => Some(current),
            _ => Some(candidate),
        })
    }

    fn predict_sample(&self, node: &TreeNode, x: &Array2<f64>, row: usize) -> i64 {
        match node {
            TreeNode::Leaf { label, .. } => *label,
            TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                if x[[row, *feature_idx]] <= *threshold {
                    self.predict_sample(left, x, row)
                } else {
                    self.predict_sample(right, x, row)
                }
            }
        }
    }

    /// Get tree depth
    pub fn get_depth(&self) -> usize {
        match &self.root {
            None => 0,
            Some(node) => node_depth(node),
        }
    }

    /// Get number of leaves
    pub fn get_n_leaves(&self) -> usize {
        match &self.root {
            None => 0,
            Some(node) => count_leaves(node),
        }
    }
}

impl WeakClassifier for DecisionTree {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<i64>, sample_weight: &Array1<f64>) -> Result<()> {
        Self::validate_inputs(x, y, sample_weight)?;

        let mut classes: Vec<i64> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        self.classes = classes;
        self.n_features = x.ncols();

        let class_of: Vec<usize> = y
            .iter()
            .map(|label| self.classes.binary_search(label).unwrap_or(0))
            .collect();

        let indices: Vec<usize> = (0..x.nrows()).collect();
        self.root = Some(self.build_tree(x, &class_of, sample_weight, &indices, 0));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<i64>> {
        let root = self.root.as_ref().ok_or(ResampleError::ModelNotFitted)?;
        if x.ncols() != self.n_features {
            return Err(ResampleError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok((0..x.nrows())
            .map(|row| self.predict_sample(root, x, row))
            .collect())
    }
}

/// Gini impurity of a weighted class histogram
fn gini(class_weights: &[f64]) -> f64 {
    let total: f64 = class_weights.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let sum_sq: f64 = class_weights.iter().map(|&w| (w / total).powi(2)).sum();
    1.0 - sum_sq
}

fn node_depth(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 1,
        TreeNode::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
    }
}

fn count_leaves(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf { .. } => 1,
        TreeNode::Split { left, right, .. } => count_leaves(left) + count_leaves(right),
    }
}
