//! SMOTEWB: SMOTE with boosting-based noise detection
//!
//! The pipeline runs in min-max scaled space:
//!
//! 1. boosted sample weights from a weak classifier ([`WeightBooster`])
//! 2. per-class noise masks from those weights ([`detect_noise`])
//! 3. neighborhood categories of the minority samples against the non-noise
//!    pool ([`classify_neighborhoods`])
//! 4. per-sample quotas ([`allocate`])
//! 5. duplication or interpolation ([`generate`])
//!
//! When no minority sample is `good` or `lonely` the whole call is handed to
//! plain [`SMOTE`]. Synthetic rows are mapped back to the input scale; the
//! original rows are returned untouched.

mod boosting;
mod config;
mod generation;
mod neighborhood;
mod noise;
mod quota;

pub use boosting::WeightBooster;
pub use config::SmoteWBConfig;
pub use generation::{generate, on_segment, SyntheticBatch};
pub use neighborhood::{
    classify_neighborhoods, first_majority_index, imbalance_ratio, Category, Neighborhood,
    NonNoiseSet,
};
pub use noise::{detect_noise, noise_threshold, NoiseMasks};
pub use quota::{allocate, Allocation};

use crate::error::Result;
use crate::neighbors::BruteForceIndex;
use crate::preprocessing::{FeatureScaler, MinMaxScaler};
use crate::synthetic::{
    indices_with_label, resolve_classes, ClassStats, ResampleOutcome, ResampleResult, Sampler,
    UnchangedReason, SMOTE,
};
use crate::training::{DecisionTree, WeakClassifier};
use crate::utils::{make_rng, ParallelConfig, SamplerRng};
use ndarray::{Array1, Array2, Axis};
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything SMOTEWB derives from a dataset before generating rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoteWBAnalysis {
    pub stats: ClassStats,
    pub n_to_sample: usize,
    /// Boosted weight of every input row, in input order
    pub weights: Array1<f64>,
    pub noise: NoiseMasks,
    pub neighborhood: Neighborhood,
    pub allocation: Allocation,
}

impl SmoteWBAnalysis {
    pub fn n_good(&self) -> usize {
        self.neighborhood.count(Category::Good)
    }

    pub fn n_lonely(&self) -> usize {
        self.neighborhood.count(Category::Lonely)
    }

    pub fn n_bad(&self) -> usize {
        self.neighborhood.count(Category::Bad)
    }
}

/// State carried from analysis into generation
struct PreparedRun {
    analysis: SmoteWBAnalysis,
    scaler: MinMaxScaler,
    x_min: Array2<f64>,
    pool: NonNoiseSet,
    rng: SamplerRng,
}

/// SMOTEWB oversampler
///
/// `C` is the weak learner probed during boosting. It is cloned fresh for
/// every call, so one sampler can be shared across threads.
#[derive(Debug, Clone)]
pub struct SmoteWB<C = DecisionTree> {
    config: SmoteWBConfig,
    classifier: C,
}

impl SmoteWB<DecisionTree> {
    /// Sampler with the default weak learner (depth 30 tree, 3 samples to split)
    pub fn new(config: SmoteWBConfig) -> Result<Self> {
        Self::with_classifier(config, DecisionTree::weak_learner())
    }
}

impl<C: WeakClassifier + Clone> SmoteWB<C> {
    /// Sampler with a custom weak learner
    pub fn with_classifier(config: SmoteWBConfig, classifier: C) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &SmoteWBConfig {
        &self.config
    }

    /// The plain SMOTE used when no minority sample is eligible
    pub fn fallback_sampler(&self) -> SMOTE {
        SMOTE::new()
            .with_proportion(self.config.proportion)
            .with_nn_params(self.config.nn_params.clone())
            .with_n_jobs(self.config.n_jobs)
            .with_random_state(self.config.random_state)
    }

    /// Run every stage up to quota allocation without generating rows.
    ///
    /// `None` when the input would be returned unchanged before any
    /// analysis (one class or fewer than two minority samples).
    pub fn analyze(&self, x: &Array2<f64>, y: &Array1<i64>) -> Result<Option<SmoteWBAnalysis>> {
        self.config.validate()?;
        let stats = match resolve_classes("SMOTEWB", x, y)? {
            Ok(stats) => stats,
            Err(_) => return Ok(None),
        };
        let n_to_sample = stats.n_to_sample(self.config.proportion);
        let threads = ParallelConfig::new(self.config.n_jobs).build_pool()?;
        let run = self.prepare(x, y, stats, n_to_sample, &threads)?;
        Ok(Some(run.analysis))
    }

    fn prepare(
        &self,
        x: &Array2<f64>,
        y: &Array1<i64>,
        stats: ClassStats,
        n_to_sample: usize,
        threads: &ThreadPool,
    ) -> Result<PreparedRun> {
        let mut scaler = MinMaxScaler::new();
        let x_scaled = scaler.fit_transform(x)?;

        let min_idx = indices_with_label(y, stats.min_label);
        let maj_idx = indices_with_label(y, stats.maj_label);
        let x_min = x_scaled.select(Axis(0), &min_idx);
        let x_maj = x_scaled.select(Axis(0), &maj_idx);

        let booster = WeightBooster::new(self.config.n_iters);
        let mut classifier = self.classifier.clone();
        let weights = threads.install(|| booster.run(&mut classifier, &x_scaled, y))?;

        let noise = detect_noise(
            weights.select(Axis(0), &min_idx).view(),
            weights.select(Axis(0), &maj_idx).view(),
        );
        debug!(
            noisy_minority = noise.n_noisy_minority(),
            noisy_majority = noise.n_noisy_majority(),
            th_min = noise.th_min,
            th_maj = noise.th_maj,
            "SMOTEWB: noise detected"
        );

        let pool = NonNoiseSet::build(&x_min, &x_maj, &noise)?;
        let mut index = BruteForceIndex::from_params(&self.config.nn_params);
        let neighborhood = threads.install(|| {
            classify_neighborhoods(&mut index, &x_min, &pool, &noise.minority, stats.n_maj)
        })?;
        debug!(
            k_max = neighborhood.k_max,
            good = neighborhood.count(Category::Good),
            lonely = neighborhood.count(Category::Lonely),
            bad = neighborhood.count(Category::Bad),
            "SMOTEWB: minority neighborhoods"
        );

        let mut rng = make_rng(self.config.random_state);
        let allocation = allocate(&neighborhood.categories, n_to_sample, &mut rng);

        Ok(PreparedRun {
            analysis: SmoteWBAnalysis {
                stats,
                n_to_sample,
                weights,
                noise,
                neighborhood,
                allocation,
            },
            scaler,
            x_min,
            pool,
            rng,
        })
    }
}

impl<C: WeakClassifier + Clone> Sampler for SmoteWB<C> {
    fn sample(&self, x: &Array2<f64>, y: &Array1<i64>) -> Result<ResampleResult> {
        self.config.validate()?;
        let stats = match resolve_classes("SMOTEWB", x, y)? {
            Ok(stats) => stats,
            Err(unchanged) => return Ok(unchanged),
        };

        let n_to_sample = stats.n_to_sample(self.config.proportion);
        if n_to_sample == 0 {
            info!("SMOTEWB: sampling is not needed");
            return Ok(ResampleResult::unchanged(x, y, UnchangedReason::NothingToSample));
        }
        info!(n_to_sample, n_min = stats.n_min, n_maj = stats.n_maj, "SMOTEWB: sampling");

        let threads = ParallelConfig::new(self.config.n_jobs).build_pool()?;
        let PreparedRun {
            analysis,
            scaler,
            x_min,
            pool,
            mut rng,
        } = self.prepare(x, y, stats, n_to_sample, &threads)?;

        let quota = match &analysis.allocation {
            Allocation::Quota(quota) => quota,
            Allocation::Fallback => {
                info!("SMOTEWB: no good or lonely minority sample, falling back to SMOTE");
                let mut result = self.fallback_sampler().sample_in_pool(x, y, &threads)?;
                if result.outcome == ResampleOutcome::Oversampled {
                    result.outcome = ResampleOutcome::Fallback;
                }
                return Ok(result);
            }
        };

        let batch = generate(&x_min, &pool, &analysis.neighborhood, quota, &mut rng)?;
        if batch.is_empty() {
            info!("SMOTEWB: no samples generated, returning the data unchanged");
            return Ok(ResampleResult::unchanged(x, y, UnchangedReason::NoSamplesGenerated));
        }

        let synthetic = scaler.inverse_transform(&batch.samples)?;
        debug!(n_synthetic = synthetic.nrows(), "SMOTEWB: samples generated");

        ResampleResult::extended(x, y, &synthetic, stats.min_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::class_counts;
    use ndarray::array;

    /// Tight minority cluster inside a scattered majority
    fn clustered_data() -> (Array2<f64>, Array1<i64>) {
        let mut data = Vec::new();
        let mut labels = Vec::new();
        for i in 0..30 {
            data.push((i % 6) as f64 * 2.0);
            data.push((i / 6) as f64 * 2.0);
            labels.push(0);
        }
        for i in 0..6 {
            data.push(20.0 + (i % 3) as f64 * 0.5);
            data.push(20.0 + (i / 3) as f64 * 0.5);
            labels.push(1);
        }
        (Array2::from_shape_vec((36, 2), data).unwrap(), Array1::from_vec(labels))
    }

    fn sampler(seed: u64) -> SmoteWB {
        SmoteWB::new(SmoteWBConfig::new().with_n_iters(20).with_random_state(seed)).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(SmoteWB::new(SmoteWBConfig::new().with_n_iters(0)).is_err());
    }

    #[test]
    fn test_balances_classes() {
        let (x, y) = clustered_data();
        let result = sampler(42).sample(&x, &y).unwrap();

        let counts = class_counts(&result.y);
        assert_eq!(counts[&0], 30);
        assert_eq!(counts[&1], 30);
        assert_eq!(result.n_synthetic, 24);
        assert_eq!(result.outcome, ResampleOutcome::Oversampled);
    }

    #[test]
    fn test_original_rows_untouched() {
        let (x, y) = clustered_data();
        let result = sampler(1).sample(&x, &y).unwrap();

        assert_eq!(result.x.slice(ndarray::s![..x.nrows(), ..]), x);
        assert_eq!(result.y.slice(ndarray::s![..y.len()]), y);
    }

    #[test]
    fn test_synthetic_rows_in_minority_region() {
        let (x, y) = clustered_data();
        let result = sampler(5).sample(&x, &y).unwrap();

        for row in result.x.rows().into_iter().skip(x.nrows()) {
            assert!(row[0] >= 20.0 - 1e-9 && row[0] <= 21.0 + 1e-9);
            assert!(row[1] >= 20.0 - 1e-9 && row[1] <= 20.5 + 1e-9);
        }
    }

    #[test]
    fn test_reproducible_with_seed() {
        let (x, y) = clustered_data();
        let a = sampler(9).sample(&x, &y).unwrap();
        let b = sampler(9).sample(&x, &y).unwrap();
        assert_eq!(a.x, b.x);
        assert_eq!(a.y, b.y);
    }

    #[test]
    fn test_zero_proportion_unchanged() {
        let (x, y) = clustered_data();
        let smotewb =
            SmoteWB::new(SmoteWBConfig::new().with_proportion(0.0).with_random_state(0)).unwrap();
        let result = smotewb.sample(&x, &y).unwrap();
        assert_eq!(result.x, x);
        assert_eq!(
            result.outcome,
            ResampleOutcome::Unchanged(UnchangedReason::NothingToSample)
        );
    }

    #[test]
    fn test_single_minority_sample_unchanged() {
        let x = array![[0.0], [1.0], [2.0]];
        let y = array![0, 0, 1];
        let result = sampler(0).sample(&x, &y).unwrap();
        assert_eq!(
            result.outcome,
            ResampleOutcome::Unchanged(UnchangedReason::TooFewMinority)
        );
    }

    #[test]
    fn test_analysis_is_consistent() {
        let (x, y) = clustered_data();
        let analysis = sampler(3).analyze(&x, &y).unwrap().unwrap();

        assert_eq!(analysis.stats.n_min, 6);
        assert_eq!(analysis.n_to_sample, 24);
        assert_eq!(analysis.neighborhood.k_max, 5);
        assert_eq!(analysis.weights.len(), 36);
        assert_eq!(analysis.n_good() + analysis.n_lonely() + analysis.n_bad(), 6);

        // The cluster is separable, so the tree fits it in the first round
        assert!(analysis.weights.iter().all(|&w| w == 0.0));
        assert_eq!(analysis.n_good(), 6);

        let quota = analysis.allocation.quota().unwrap();
        assert_eq!(quota, &[4, 4, 4, 4, 4, 4]);
    }

    #[test]
    fn test_single_leading_neighbor_generates_nothing() {
        // Each minority sample has the other as its only leading neighbor
        let x = array![[0.0], [0.1], [5.0], [5.1], [5.2], [5.3]];
        let y = array![1, 1, 0, 0, 0, 0];
        let smotewb = sampler(2);

        let analysis = smotewb.analyze(&x, &y).unwrap().unwrap();
        assert_eq!(analysis.neighborhood.leading, vec![1, 1]);
        assert_eq!(analysis.n_good(), 2);
        assert_eq!(analysis.allocation.quota().unwrap(), &[1, 1]);

        let result = smotewb.sample(&x, &y).unwrap();
        assert_eq!(result.x, x);
        assert_eq!(result.y, y);
        assert_eq!(
            result.outcome,
            ResampleOutcome::Unchanged(UnchangedReason::NoSamplesGenerated)
        );
    }

    #[test]
    fn test_analyze_single_class_is_none() {
        let x = array![[0.0], [1.0]];
        let y = array![2, 2];
        assert!(sampler(0).analyze(&x, &y).unwrap().is_none());
    }

    #[test]
    fn test_fallback_matches_smote_counts() {
        // Minority points sit on top of majority points with the opposite
        // label, so boosting pushes their weight above the threshold and
        // their nearest neighbors are all majority.
        let mut data = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            data.push(i as f64);
            labels.push(0);
        }
        for &v in &[3.0, 9.0, 15.0] {
            data.push(v);
            labels.push(1);
        }
        let x = Array2::from_shape_vec((23, 1), data).unwrap();
        let y = Array1::from_vec(labels);

        let smotewb = sampler(4);
        let analysis = smotewb.analyze(&x, &y).unwrap().unwrap();
        assert_eq!(analysis.n_bad(), 3);
        assert!(analysis.allocation.is_fallback());

        let result = smotewb.sample(&x, &y).unwrap();
        let smote = smotewb.fallback_sampler().sample(&x, &y).unwrap();
        assert_eq!(result.outcome, ResampleOutcome::Fallback);
        assert_eq!(result.n_synthetic, smote.n_synthetic);
        assert_eq!(result.x, smote.x);
    }

    #[test]
    fn test_fallback_runs_on_the_configured_threads() {
        let mut data: Vec<f64> = (0..20).map(f64::from).collect();
        data.extend([3.0, 9.0, 15.0]);
        let mut labels = vec![0; 20];
        labels.extend([1, 1, 1]);
        let x = Array2::from_shape_vec((23, 1), data).unwrap();
        let y = Array1::from_vec(labels);

        let smotewb = SmoteWB::new(
            SmoteWBConfig::new().with_n_iters(20).with_n_jobs(3).with_random_state(4),
        )
        .unwrap();
        let result = smotewb.sample(&x, &y).unwrap();
        let smote = smotewb.fallback_sampler().sample(&x, &y).unwrap();

        assert_eq!(result.outcome, ResampleOutcome::Fallback);
        assert_eq!(result.x, smote.x);
        assert_eq!(result.x, sampler(4).sample(&x, &y).unwrap().x);
    }
}
