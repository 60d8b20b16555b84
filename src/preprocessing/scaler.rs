//! Feature scaling implementations

use crate::error::{ResampleError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Reversible feature scaling used around the oversampling pipeline
pub trait FeatureScaler {
    /// Fit on `x` and return the scaled copy
    fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>>;

    /// Map scaled rows back to the original feature space
    fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>>;
}

/// Per-feature parameters of a fitted scaler
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    center: Array1<f64>, // per-feature minimum
    scale: Array1<f64>,  // per-feature range, 1.0 for constant features
}

/// Min-Max scaling: (x - min) / (max - min)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinMaxScaler {
    params: Option<ScalerParams>,
}

impl MinMaxScaler {
    /// Create a new scaler
    pub fn new() -> Self {
        Self { params: None }
    }

    /// Fit the scaler to the data
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(ResampleError::ValidationError(
                "Cannot fit a scaler on an empty matrix".to_string(),
            ));
        }

        let center = x.fold_axis(Axis(0), f64::INFINITY, |&acc, &v| acc.min(v));
        let max = x.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &v| acc.max(v));
        let scale = (&max - &center).mapv(|range| if range == 0.0 { 1.0 } else { range });

        self.params = Some(ScalerParams { center, scale });
        Ok(self)
    }

    /// Transform the data
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let params = self.fitted_params(x)?;
        Ok((x - &params.center) / &params.scale)
    }

    fn fitted_params(&self, x: &Array2<f64>) -> Result<&ScalerParams> {
        let params = self.params.as_ref().ok_or(ResampleError::ModelNotFitted)?;
        if x.ncols() != params.center.len() {
            return Err(ResampleError::ShapeError {
                expected: format!("{} features", params.center.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(params)
    }
}

impl FeatureScaler for MinMaxScaler {
    fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let params = self.fitted_params(x)?;
        Ok(x * &params.scale + &params.center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_minmax_scaler() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [5.0, 50.0]];

        let mut scaler = MinMaxScaler::new();
        let scaled = scaler.fit_transform(&x).unwrap();

        for col in scaled.columns() {
            let min = col.iter().copied().fold(f64::INFINITY, f64::min);
            let max = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert_abs_diff_eq!(min, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(max, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_constant_feature_maps_to_zero() {
        let x = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];

        let mut scaler = MinMaxScaler::new();
        let scaled = scaler.fit_transform(&x).unwrap();

        assert!(scaled.column(0).iter().all(|&v| v == 0.0));
        let restored = scaler.inverse_transform(&scaled).unwrap();
        assert!(restored.column(0).iter().all(|&v| v == 5.0));
    }

    #[test]
    fn test_inverse_transform() {
        let x = array![[1.0, -4.0], [2.5, 0.0], [7.0, 3.5], [4.0, 1.0]];

        let mut scaler = MinMaxScaler::new();
        let scaled = scaler.fit_transform(&x).unwrap();
        let restored = scaler.inverse_transform(&scaled).unwrap();

        for (o, r) in x.iter().zip(restored.iter()) {
            assert_abs_diff_eq!(*o, *r, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_not_fitted() {
        let scaler = MinMaxScaler::new();
        let x = array![[1.0]];
        assert!(matches!(scaler.transform(&x), Err(ResampleError::ModelNotFitted)));
    }

    #[test]
    fn test_feature_mismatch() {
        let mut scaler = MinMaxScaler::new();
        scaler.fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let err = scaler.inverse_transform(&array![[0.5]]).unwrap_err();
        assert!(matches!(err, ResampleError::ShapeError { .. }));
    }
}
