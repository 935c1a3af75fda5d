use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::reading::ClinicalReading;

/// Number of features the classifier was trained on.
pub const FEATURE_COUNT: usize = 10;

/// Feature names in the order the classifier expects them.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "PPE",
    "spread1",
    "MDVP:Fo(Hz)",
    "spread2",
    "MDVP:Flo(Hz)",
    "MDVP:Fhi(Hz)",
    "Jitter:DDP",
    "NHR",
    "MDVP:Jitter(Abs)",
    "Shimmer:APQ5",
];

/// A single row of classifier input, in training order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

impl From<&ClinicalReading> for FeatureVector {
    fn from(r: &ClinicalReading) -> Self {
        Self([
            r.ppe,
            r.spread1,
            r.fo,
            r.spread2,
            r.flo,
            r.fhi,
            r.ddp,
            r.nhr,
            r.jitter_abs,
            r.apq5,
        ])
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}
