//! Data preprocessing module
//!
//! Feature scaling applied before neighbor search and interpolation, and
//! undone on the generated rows afterwards.

mod scaler;

pub use scaler::{FeatureScaler, MinMaxScaler};
