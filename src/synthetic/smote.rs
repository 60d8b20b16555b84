//! Plain SMOTE

use crate::error::{ResampleError, Result};
use crate::neighbors::{BruteForceIndex, NeighborIndex, NeighborParams};
use crate::synthetic::{
    resolve_classes, rows_with_label, ResampleResult, Sampler, UnchangedReason,
};
use crate::utils::{make_rng, ParallelConfig, SamplerRng};
use ndarray::{Array2, ArrayView1};
use rand::Rng;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// SMOTE (Synthetic Minority Over-sampling Technique)
///
/// Each synthetic row is a random point on the segment between a randomly
/// chosen minority sample and one of its `n_neighbors` nearest minority
/// neighbors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SMOTE {
    /// Fraction of the class-size gap to fill (1.0 balances the classes)
    proportion: f64,
    /// Neighbor search options
    nn_params: NeighborParams,
    /// Worker threads for the neighbor search
    n_jobs: usize,
    /// Random seed
    random_state: Option<u64>,
}

impl SMOTE {
    /// Create new SMOTE sampler
    pub fn new() -> Self {
        Self {
            proportion: 1.0,
            nn_params: NeighborParams::default(),
            n_jobs: 1,
            random_state: None,
        }
    }

    /// Set the target balance proportion
    pub fn with_proportion(mut self, proportion: f64) -> Self {
        self.proportion = proportion;
        self
    }

    /// Set number of neighbors
    pub fn with_k_neighbors(mut self, k: usize) -> Self {
        self.nn_params.n_neighbors = k;
        self
    }

    /// Set all neighbor options
    pub fn with_nn_params(mut self, params: NeighborParams) -> Self {
        self.nn_params = params;
        self
    }

    /// Set number of worker threads
    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    /// Set or clear the random seed
    pub fn with_random_state(mut self, random_state: Option<u64>) -> Self {
        self.random_state = random_state;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.proportion.is_finite() && self.proportion >= 0.0) {
            return Err(ResampleError::invalid_parameter(
                "proportion",
                self.proportion,
                "must be a finite number >= 0",
            ));
        }
        if self.n_jobs < 1 {
            return Err(ResampleError::invalid_parameter("n_jobs", self.n_jobs, "must be at least 1"));
        }
        self.nn_params.validate()
    }

    /// Draw `n_to_sample` rows; `neighbors[i]` starts with `i` itself
    fn generate_samples(
        x_min: &Array2<f64>,
        neighbors: &Array2<usize>,
        n_to_sample: usize,
        rng: &mut SamplerRng,
    ) -> Array2<f64> {
        let n_features = x_min.ncols();
        let mut samples = Array2::zeros((n_to_sample, n_features));

        for mut out in samples.rows_mut() {
            let base = rng.gen_range(0..x_min.nrows());
            let column = rng.gen_range(1..neighbors.ncols());
            let neighbor = neighbors[[base, column]];
            out.assign(&interpolate(x_min.row(base), x_min.row(neighbor), rng.gen()));
        }

        samples
    }

    /// Sample with the neighbor search running on `threads`
    pub(crate) fn sample_in_pool(
        &self,
        x: &Array2<f64>,
        y: &ndarray::Array1<i64>,
        threads: &ThreadPool,
    ) -> Result<ResampleResult> {
        self.validate()?;
        let stats = match resolve_classes("SMOTE", x, y)? {
            Ok(stats) => stats,
            Err(unchanged) => return Ok(unchanged),
        };

        let n_to_sample = stats.n_to_sample(self.proportion);
        if n_to_sample == 0 {
            info!("SMOTE: sampling is not needed");
            return Ok(ResampleResult::unchanged(x, y, UnchangedReason::NothingToSample));
        }
        info!(n_to_sample, "SMOTE: sampling");

        let x_min = rows_with_label(x, y, stats.min_label);
        let n_neighbors = x_min.nrows().min(self.nn_params.n_neighbors + 1);

        let mut index = BruteForceIndex::from_params(&self.nn_params);
        index.fit(&x_min)?;
        let neighbors = threads.install(|| index.kneighbors(&x_min, n_neighbors))?;

        if neighbors.ncols() < 2 {
            return Ok(ResampleResult::unchanged(x, y, UnchangedReason::NoSamplesGenerated));
        }

        let mut rng = make_rng(self.random_state);
        let synthetic = Self::generate_samples(&x_min, &neighbors, n_to_sample, &mut rng);
        debug!(n_synthetic = synthetic.nrows(), "SMOTE: samples generated");

        ResampleResult::extended(x, y, &synthetic, stats.min_label)
    }
}

impl Default for SMOTE {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for SMOTE {
    fn sample(&self, x: &Array2<f64>, y: &ndarray::Array1<i64>) -> Result<ResampleResult> {
        self.validate()?;
        let threads = ParallelConfig::new(self.n_jobs).build_pool()?;
        self.sample_in_pool(x, y, &threads)
    }
}

/// Point `gap` of the way from `from` to `to`
pub(crate) fn interpolate(from: ArrayView1<f64>, to: ArrayView1<f64>, gap: f64) -> ndarray::Array1<f64> {
    &from + &((&to - &from) * gap)
}
