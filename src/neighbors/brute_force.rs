//! Exhaustive neighbor search

use super::{compute_distance, DistanceMetric, NeighborIndex, NeighborParams};
use crate::error::{ResampleError, Result};
use crate::utils::parallel_map_indexed;
use ndarray::Array2;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Max-heap entry ordered by (distance, index); keeps the k smallest
#[derive(Debug, Clone, Copy)]
struct DistIdx(f64, usize);

impl PartialEq for DistIdx {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for DistIdx {}
impl PartialOrd for DistIdx {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for DistIdx {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .partial_cmp(&other.0)
            .unwrap_or(Ordering::Equal)
            .then(self.1.cmp(&other.1))
    }
}

/// Brute-force k-NN index, O(n) distance evaluations per query
#[derive(Debug, Clone)]
pub struct BruteForceIndex {
    metric: DistanceMetric,
    metric_tensor: Option<Array2<f64>>,
    points: Option<Array2<f64>>,
}

impl BruteForceIndex {
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            metric,
            metric_tensor: None,
            points: None,
        }
    }

    /// Build from neighbor options (metric and optional tensor)
    pub fn from_params(params: &NeighborParams) -> Self {
        Self {
            metric: params.metric,
            metric_tensor: params.metric_tensor.clone(),
            points: None,
        }
    }

    fn nearest(&self, points: &Array2<f64>, query: ndarray::ArrayView1<f64>, k: usize) -> Vec<usize> {
        let mut heap: BinaryHeap<DistIdx> = BinaryHeap::with_capacity(k + 1);

        for (i, row) in points.rows().into_iter().enumerate() {
            let entry = DistIdx(
                compute_distance(query, row, self.metric, self.metric_tensor.as_ref()),
                i,
            );
            if heap.len() < k {
                heap.push(entry);
            } else if let Some(top) = heap.peek() {
                if entry < *top {
                    heap.pop();
                    heap.push(entry);
                }
            }
        }

        heap.into_sorted_vec().into_iter().map(|DistIdx(_, i)| i).collect()
    }
}

impl Default for BruteForceIndex {
    fn default() -> Self {
        Self::new(DistanceMetric::Euclidean)
    }
}

impl NeighborIndex for BruteForceIndex {
    fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        if let Some(tensor) = &self.metric_tensor {
            if tensor.nrows() != x.ncols() || tensor.ncols() != x.ncols() {
                return Err(ResampleError::ShapeError {
                    expected: format!("{0}x{0} metric tensor", x.ncols()),
                    actual: format!("{}x{}", tensor.nrows(), tensor.ncols()),
                });
            }
        }
        self.points = Some(x.clone());
        Ok(())
    }

    fn kneighbors(&self, query: &Array2<f64>, k: usize) -> Result<Array2<usize>> {
        let points = self.points.as_ref().ok_or(ResampleError::ModelNotFitted)?;
        if query.ncols() != points.ncols() {
            return Err(ResampleError::ShapeError {
                expected: format!("{} features", points.ncols()),
                actual: format!("{} features", query.ncols()),
            });
        }

        let k = k.min(points.nrows());

        // One independent search per query row, collected in row order
        let rows: Vec<Vec<usize>> =
            parallel_map_indexed(query.nrows(), |i| self.nearest(points, query.row(i), k));

        let flat: Vec<usize> = rows.into_iter().flatten().collect();
        Ok(Array2::from_shape_vec((query.nrows(), k), flat)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_self_is_first_neighbor() {
        let x = array![[0.0, 0.0], [1.0, 0.0], [5.0, 5.0], [0.0, 2.0]];
        let mut index = BruteForceIndex::default();
        index.fit(&x).unwrap();

        let nn = index.kneighbors(&x, 3).unwrap();
        assert_eq!(nn.shape(), &[4, 3]);
        for i in 0..4 {
            assert_eq!(nn[[i, 0]], i);
        }
        assert_eq!(nn.row(0).to_vec(), vec![0, 1, 3]);
    }

    #[test]
    fn test_ties_broken_by_index() {
        let points = array![[1.0], [-1.0], [2.0], [-2.0]];
        let mut index = BruteForceIndex::default();
        index.fit(&points).unwrap();

        let nn = index.kneighbors(&array![[0.0]], 4).unwrap();
        assert_eq!(nn.row(0).to_vec(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_k_truncated_to_fitted_points() {
        let mut index = BruteForceIndex::default();
        index.fit(&array![[0.0], [1.0]]).unwrap();

        let nn = index.kneighbors(&array![[0.2]], 10).unwrap();
        assert_eq!(nn.ncols(), 2);
    }

    #[test]
    fn test_metric_tensor_changes_ranking() {
        let points = array![[1.0, 0.0], [0.0, 2.0]];
        let params = NeighborParams::new().with_metric_tensor(array![[10.0, 0.0], [0.0, 1.0]]);
        let mut index = BruteForceIndex::from_params(&params);
        index.fit(&points).unwrap();

        // Euclidean would rank [1, 0] first; the tensor stretches the first axis
        let nn = index.kneighbors(&array![[0.0, 0.0]], 2).unwrap();
        assert_eq!(nn.row(0).to_vec(), vec![1, 0]);
    }

    #[test]
    fn test_query_before_fit() {
        let index = BruteForceIndex::default();
        assert!(matches!(
            index.kneighbors(&array![[0.0]], 1),
            Err(ResampleError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_tensor_shape_checked_on_fit() {
        let params = NeighborParams::new().with_metric_tensor(Array2::eye(3));
        let mut index = BruteForceIndex::from_params(&params);
        assert!(matches!(
            index.fit(&array![[0.0, 1.0]]),
            Err(ResampleError::ShapeError { .. })
        ));
    }
}
