//! SMOTEWB - Noise-aware synthetic minority oversampling
//!
//! This crate balances imbalanced binary datasets by generating synthetic
//! minority samples. A boosted weak learner flags likely label noise, the
//! remaining samples define each minority point's neighborhood, and new rows
//! are interpolated (or duplicated) only where the neighborhood supports it.
//!
//! # Modules
//!
//! ## Core
//! - [`synthetic`] - SMOTEWB and plain SMOTE samplers
//! - [`training`] - Weighted decision tree used as the boosting probe
//! - [`neighbors`] - Brute-force nearest-neighbor search
//! - [`preprocessing`] - Min-max feature scaling
//!
//! ## Support
//! - [`utils`] - Thread pools, random generators, CSV I/O
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use smotewb::prelude::*;
//! use ndarray::{array, Array1};
//!
//! let x = array![[0.0, 0.0], [0.1, 0.2], [5.0, 5.0], [5.1, 4.9], [4.8, 5.2], [5.3, 5.1]];
//! let y: Array1<i64> = array![1, 1, 0, 0, 0, 0];
//!
//! let sampler = SmoteWB::new(SmoteWBConfig::new().with_random_state(42))?;
//! let result = sampler.sample(&x, &y)?;
//! assert_eq!(result.x.nrows(), x.nrows() + result.n_synthetic);
//! # Ok::<(), smotewb::ResampleError>(())
//! ```

// Core error handling
pub mod error;

// Core modules
pub mod neighbors;
pub mod preprocessing;
pub mod synthetic;
pub mod training;

// Utilities
pub mod utils;

// Services
pub mod cli;

pub use error::{ResampleError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{ResampleError, Result};

    // Samplers
    pub use crate::synthetic::{
        Category, ClassStats, ResampleOutcome, ResampleResult, Sampler, SmoteWB, SmoteWBAnalysis,
        SmoteWBConfig, UnchangedReason, SMOTE,
    };

    // Collaborators
    pub use crate::neighbors::{BruteForceIndex, DistanceMetric, NeighborIndex, NeighborParams};
    pub use crate::preprocessing::{FeatureScaler, MinMaxScaler};
    pub use crate::training::{DecisionTree, WeakClassifier};

    // Utilities
    pub use crate::utils::{DataLoader, DataSaver, LabelledData, ParallelConfig};
}
