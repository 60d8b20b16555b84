//! Error types for the SMOTEWB oversampler

use thiserror::Error;

/// Result type alias for resampling operations
pub type Result<T> = std::result::Result<T, ResampleError>;

/// Main error type of the crate
#[derive(Error, Debug)]
pub enum ResampleError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Column not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ResampleError {
    /// Shorthand for a rejected configuration value
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ResampleError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<polars::error::PolarsError> for ResampleError {
    fn from(err: polars::error::PolarsError) -> Self {
        ResampleError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for ResampleError {
    fn from(err: serde_json::Error) -> Self {
        ResampleError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for ResampleError {
    fn from(err: ndarray::ShapeError) -> Self {
        ResampleError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for ResampleError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        ResampleError::ThreadPoolError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResampleError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = ResampleError::invalid_parameter("n_iters", 0, "must be at least 1");
        assert_eq!(err.to_string(), "Invalid parameter: n_iters = 0, must be at least 1");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ResampleError = io_err.into();
        assert!(matches!(err, ResampleError::IoError(_)));
    }
}
