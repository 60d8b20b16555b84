//! Neighborhood categories of minority samples
//!
//! Every minority sample is ranked against the pool of non-noise samples and
//! labelled by how many minority neighbors precede the first majority one.

use super::noise::NoiseMasks;
use crate::error::Result;
use crate::neighbors::NeighborIndex;
use ndarray::{concatenate, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local neighborhood category of a minority sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// At least one minority neighbor before the first majority neighbor
    Good,
    /// No leading minority neighbor, not noise
    Lonely,
    /// No leading minority neighbor, flagged as noise
    Bad,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Good => write!(f, "good"),
            Category::Lonely => write!(f, "lonely"),
            Category::Bad => write!(f, "bad"),
        }
    }
}

/// Minority and majority samples that survived noise filtering
#[derive(Debug, Clone)]
pub struct NonNoiseSet {
    /// Non-noise minority rows followed by non-noise majority rows
    pub x: Array2<f64>,
    /// `true` for rows that came from the minority class
    pub is_minority: Vec<bool>,
}

impl NonNoiseSet {
    /// Keep the rows whose noise flag is `false`, minority first
    pub fn build(x_min: &Array2<f64>, x_maj: &Array2<f64>, noise: &NoiseMasks) -> Result<Self> {
        let keep_min: Vec<usize> = clean_indices(&noise.minority);
        let keep_maj: Vec<usize> = clean_indices(&noise.majority);

        let x = concatenate(
            Axis(0),
            &[
                x_min.select(Axis(0), &keep_min).view(),
                x_maj.select(Axis(0), &keep_maj).view(),
            ],
        )?;

        let mut is_minority = vec![true; keep_min.len()];
        is_minority.resize(keep_min.len() + keep_maj.len(), false);

        Ok(Self { x, is_minority })
    }

    pub fn len(&self) -> usize {
        self.is_minority.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_minority.is_empty()
    }
}

fn clean_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter(|(_, &noisy)| !noisy)
        .map(|(i, _)| i)
        .collect()
}

/// Rankings, leading-neighbor counts and categories of the minority samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighborhood {
    /// ceil(n_maj / n_min)
    pub k_max: usize,
    /// Per minority sample: indices into the non-noise pool, nearest first,
    /// first returned neighbor dropped as self
    pub rankings: Vec<Vec<usize>>,
    /// Per minority sample: number of leading minority neighbors (`k_i`)
    pub leading: Vec<usize>,
    /// Per minority sample category
    pub categories: Vec<Category>,
}

impl Neighborhood {
    /// Leading minority neighbors of minority sample `i`
    pub fn leading_neighbors(&self, i: usize) -> &[usize] {
        let ranking = &self.rankings[i];
        &ranking[..self.leading[i].min(ranking.len())]
    }

    /// Interpolation partners of minority sample `i`: its leading minority
    /// neighbors without the first one. Empty when `k_i <= 1`.
    pub fn interpolation_partners(&self, i: usize) -> &[usize] {
        let leading = self.leading_neighbors(i);
        &leading[1.min(leading.len())..]
    }

    /// Count of samples in `category`
    pub fn count(&self, category: Category) -> usize {
        self.categories.iter().filter(|&&c| c == category).count()
    }
}

/// Imbalance ratio rounded up
pub fn imbalance_ratio(n_min: usize, n_maj: usize) -> usize {
    if n_min == 0 {
        return 0;
    }
    n_maj.div_ceil(n_min)
}

/// Position of the first majority entry in `ranking`, if any
pub fn first_majority_index(ranking: &[usize], is_minority: &[bool]) -> Option<usize> {
    ranking.iter().position(|&j| !is_minority[j])
}

/// Rank every minority sample against `pool` and assign its category.
///
/// `index` is fitted on the pool here; the query asks for
/// `min(|pool|, k_max + 1)` neighbors and drops the first column. A ranking
/// without a majority entry gives `k_i = k_max`. An empty pool gives
/// `k_i = 0` for every sample, so they all end up `lonely` or `bad`.
pub fn classify_neighborhoods<I: NeighborIndex>(
    index: &mut I,
    x_min: &Array2<f64>,
    pool: &NonNoiseSet,
    noise_min: &[bool],
    n_maj: usize,
) -> Result<Neighborhood> {
    let n_min = x_min.nrows();
    let k_max = imbalance_ratio(n_min, n_maj);
    let n_neighbors = pool.len().min(k_max + 1);

    if pool.is_empty() {
        return Ok(Neighborhood {
            k_max,
            rankings: vec![Vec::new(); n_min],
            leading: vec![0; n_min],
            categories: noise_min
                .iter()
                .map(|&noisy| if noisy { Category::Bad } else { Category::Lonely })
                .collect(),
        });
    }

    index.fit(&pool.x)?;
    let rankings: Vec<Vec<usize>> = index
        .kneighbors(x_min, n_neighbors)?
        .rows()
        .into_iter()
        .map(|row| row.iter().skip(1).copied().collect())
        .collect();

    let leading: Vec<usize> = rankings
        .iter()
        .map(|ranking| first_majority_index(ranking, &pool.is_minority).unwrap_or(k_max))
        .collect();

    let categories: Vec<Category> = leading
        .iter()
        .zip(noise_min)
        .map(|(&k_i, &noisy)| match (k_i > 0, noisy) {
            (true, _) => Category::Good,
            (false, false) => Category::Lonely,
            (false, true) => Category::Bad,
        })
        .collect();

    Ok(Neighborhood {
        k_max,
        rankings,
        leading,
        categories,
    })
}
