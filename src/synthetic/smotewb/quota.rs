//! Per-sample generation quotas

use super::neighborhood::Category;
use crate::utils::SamplerRng;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Result of distributing the requested sample count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allocation {
    /// One quota per minority sample, summing to the requested count
    Quota(Vec<usize>),
    /// No `good` or `lonely` sample exists; plain SMOTE takes over
    Fallback,
}

impl Allocation {
    pub fn quota(&self) -> Option<&[usize]> {
        match self {
            Allocation::Quota(q) => Some(q),
            Allocation::Fallback => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Allocation::Fallback)
    }
}

/// Spread `n_to_sample` over the eligible (`good` and `lonely`) samples.
///
/// Every eligible sample first receives `ceil(n_to_sample / n_eligible)`.
/// The overshoot is removed one unit at a time from samples drawn out of the
/// `good ∪ bad` pool; draws that land on a zero quota are dropped and the
/// rest of the overshoot comes from uniformly chosen positive quotas.
pub fn allocate(categories: &[Category], n_to_sample: usize, rng: &mut SamplerRng) -> Allocation {
    let n_eligible = categories.iter().filter(|&&c| c != Category::Bad).count();
    if n_eligible == 0 {
        return Allocation::Fallback;
    }

    let per_sample = n_to_sample.div_ceil(n_eligible);
    let mut quota: Vec<usize> = categories
        .iter()
        .map(|&c| if c == Category::Bad { 0 } else { per_sample })
        .collect();

    let mut remaining = per_sample * n_eligible - n_to_sample;
    if remaining == 0 {
        return Allocation::Quota(quota);
    }

    let pool: Vec<usize> = categories
        .iter()
        .enumerate()
        .filter(|(_, &c)| c != Category::Lonely)
        .map(|(i, _)| i)
        .collect();

    for pick in correction_draws(&pool, remaining, rng) {
        if quota[pick] > 0 {
            quota[pick] -= 1;
            remaining -= 1;
        }
    }

    // The total still exceeds n_to_sample by `remaining`, so a positive
    // entry always exists here.
    while remaining > 0 {
        let positive: Vec<usize> = (0..quota.len()).filter(|&i| quota[i] > 0).collect();
        let pick = positive[rng.gen_range(0..positive.len())];
        quota[pick] -= 1;
        remaining -= 1;
    }

    Allocation::Quota(quota)
}

/// `count` picks from `pool`: without replacement when the pool is large
/// enough, with replacement otherwise
fn correction_draws(pool: &[usize], count: usize, rng: &mut SamplerRng) -> Vec<usize> {
    if pool.is_empty() {
        return Vec::new();
    }
    if pool.len() >= count {
        index::sample(rng, pool.len(), count)
            .into_iter()
            .map(|p| pool[p])
            .collect()
    } else {
        (0..count).map(|_| pool[rng.gen_range(0..pool.len())]).collect()
    }
}
