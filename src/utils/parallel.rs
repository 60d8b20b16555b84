//! Parallel processing utilities

use crate::error::{ResampleError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for parallel processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Number of worker threads
    pub n_jobs: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self { n_jobs: 1 }
    }
}

impl ParallelConfig {
    /// Create a new parallel configuration
    pub fn new(n_jobs: usize) -> Self {
        Self { n_jobs }
    }

    /// Build a dedicated rayon pool with `n_jobs` threads.
    ///
    /// Built once per resampling run and shared by every parallel stage.
    pub fn build_pool(&self) -> Result<rayon::ThreadPool> {
        if self.n_jobs == 0 {
            return Err(ResampleError::invalid_parameter(
                "n_jobs",
                self.n_jobs,
                "must be at least 1",
            ));
        }
        Ok(rayon::ThreadPoolBuilder::new()
            .num_threads(self.n_jobs)
            .build()?)
    }
}

/// Parallel map over indices `0..n`, results kept in index order
pub fn parallel_map_indexed<U, F>(n: usize, f: F) -> Vec<U>
where
    U: Send,
    F: Fn(usize) -> U + Send + Sync,
{
    (0..n).into_par_iter().map(f).collect()
}
