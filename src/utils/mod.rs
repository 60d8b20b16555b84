//! Utility functions and types

mod parallel;
pub mod data_loader;

pub use parallel::{parallel_map_indexed, ParallelConfig};
pub use data_loader::{DataLoader, DataSaver, LabelledData};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Generator used by every random draw in the crate
pub type SamplerRng = Xoshiro256PlusPlus;

/// Seeded generator, or one seeded from OS entropy when no seed is given
pub fn make_rng(random_state: Option<u64>) -> SamplerRng {
    match random_state {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_entropy(),
    }
}
