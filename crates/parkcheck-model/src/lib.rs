//! parkcheck-model
//!
//! Classifier adapter: loads the fitted scaler and classifier artifacts
//! once at startup and evaluates them on a single feature row.

pub mod adapter;
pub mod error;
pub mod forest;
pub mod scaler;

use parkcheck_core::models::features::FeatureVector;
use parkcheck_core::models::label::Label;

/// A fitted feature scaler.
pub trait Scaler: Send + Sync {
    fn transform(&self, row: &FeatureVector) -> FeatureVector;
}

/// A fitted binary classifier.
pub trait Classifier: Send + Sync {
    fn predict(&self, row: &FeatureVector) -> Label;
}
