//! SMOTEWB configuration

use crate::error::{ResampleError, Result};
use crate::neighbors::NeighborParams;
use serde::{Deserialize, Serialize};

/// Configuration for [`SmoteWB`](super::SmoteWB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoteWBConfig {
    /// Fraction of the majority/minority gap to fill; 1.0 balances the classes
    pub proportion: f64,

    /// Boosting rounds used for noise detection
    pub n_iters: usize,

    /// Neighbor search options, shared with the SMOTE fallback
    pub nn_params: NeighborParams,

    /// Number of worker threads
    pub n_jobs: usize,

    /// Random seed for reproducibility
    pub random_state: Option<u64>,
}

impl Default for SmoteWBConfig {
    fn default() -> Self {
        Self {
            proportion: 1.0,
            n_iters: 100,
            nn_params: NeighborParams::default(),
            n_jobs: 1,
            random_state: None,
        }
    }
}

impl SmoteWBConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_proportion(mut self, proportion: f64) -> Self {
        self.proportion = proportion;
        self
    }

    pub fn with_n_iters(mut self, n_iters: usize) -> Self {
        self.n_iters = n_iters;
        self
    }

    pub fn with_nn_params(mut self, nn_params: NeighborParams) -> Self {
        self.nn_params = nn_params;
        self
    }

    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Reject values the sampler cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.proportion.is_finite() && self.proportion >= 0.0) {
            return Err(ResampleError::invalid_parameter(
                "proportion",
                self.proportion,
                "must be a finite number >= 0",
            ));
        }
        if self.n_iters < 1 {
            return Err(ResampleError::invalid_parameter("n_iters", self.n_iters, "must be at least 1"));
        }
        if self.n_jobs < 1 {
            return Err(ResampleError::invalid_parameter("n_jobs", self.n_jobs, "must be at least 1"));
        }
        self.nn_params.validate()
    }
}
