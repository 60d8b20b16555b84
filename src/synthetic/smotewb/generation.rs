//! Synthetic sample generation in scaled space

use super::neighborhood::{Category, Neighborhood, NonNoiseSet};
use crate::error::Result;
use crate::synthetic::smote::interpolate;
use crate::utils::SamplerRng;
use ndarray::{Array2, ArrayView1};
use rand::Rng;

/// Generated rows with their provenance
#[derive(Debug, Clone)]
pub struct SyntheticBatch {
    /// One row per synthetic sample
    pub samples: Array2<f64>,
    /// Minority index each row was generated from
    pub sources: Vec<usize>,
    /// Pool index of the interpolation partner; `None` for duplicates
    pub partners: Vec<Option<usize>>,
}

impl SyntheticBatch {
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Emit `quota[i]` rows for every minority sample `i`, in index order.
///
/// `lonely` samples are duplicated. `good` samples draw all their partners
/// from [`Neighborhood::interpolation_partners`] first, then interpolate with
/// a fresh gap per row; with no partner they emit nothing. `bad` samples
/// never have a quota.
pub fn generate(
    x_min: &Array2<f64>,
    pool: &NonNoiseSet,
    hood: &Neighborhood,
    quota: &[usize],
    rng: &mut SamplerRng,
) -> Result<SyntheticBatch> {
    let n_features = x_min.ncols();
    let mut data: Vec<f64> = Vec::new();
    let mut sources = Vec::new();
    let mut partners = Vec::new();

    for (i, (&count, &category)) in quota.iter().zip(&hood.categories).enumerate() {
        if count == 0 {
            continue;
        }
        let base = x_min.row(i);

        match category {
            Category::Lonely => {
                for _ in 0..count {
                    data.extend(base.iter());
                    sources.push(i);
                    partners.push(None);
                }
            }
            Category::Good => {
                let candidates = hood.interpolation_partners(i);
                if candidates.is_empty() {
                    continue;
                }
                let picks: Vec<usize> = (0..count)
                    .map(|_| candidates[rng.gen_range(0..candidates.len())])
                    .collect();
                for j in picks {
                    let gap: f64 = rng.gen();
                    data.extend(interpolate(base, pool.x.row(j), gap).iter());
                    sources.push(i);
                    partners.push(Some(j));
                }
            }
            Category::Bad => {}
        }
    }

    let samples = Array2::from_shape_vec((sources.len(), n_features), data)?;

    Ok(SyntheticBatch {
        samples,
        sources,
        partners,
    })
}

/// Whether `point` lies on the segment from `from` to `to`, within `tol`
pub fn on_segment(point: ArrayView1<f64>, from: ArrayView1<f64>, to: ArrayView1<f64>, tol: f64) -> bool {
    let direction = &to - &from;
    let offset = &point - &from;
    let length_sq = direction.dot(&direction);
    if length_sq == 0.0 {
        return offset.iter().all(|v| v.abs() <= tol);
    }
    let t = offset.dot(&direction) / length_sq;
    if !(-tol..=1.0 + tol).contains(&t) {
        return false;
    }
    offset
        .iter()
        .zip(direction.iter())
        .all(|(o, d)| (o - t * d).abs() <= tol)
}
