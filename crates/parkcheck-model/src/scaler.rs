use serde::{Deserialize, Serialize};

use parkcheck_core::models::features::{FEATURE_COUNT, FeatureVector};

use crate::Scaler;
use crate::error::ModelError;

/// On-disk form of a fitted standard scaler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Standardises each feature as `(x - mean) / scale`.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    pub fn new(mean: [f64; FEATURE_COUNT], scale: [f64; FEATURE_COUNT]) -> Self {
        // A constant feature was fitted with zero variance; leave it unscaled.
        let scale = scale.map(|s| if s == 0.0 { 1.0 } else { s });
        Self { mean, scale }
    }
}

impl TryFrom<ScalerArtifact> for StandardScaler {
    type Error = ModelError;

    fn try_from(artifact: ScalerArtifact) -> Result<Self, Self::Error> {
        let mean = to_row("mean", &artifact.mean)?;
        let scale = to_row("scale", &artifact.scale)?;
        Ok(Self::new(mean, scale))
    }
}

fn to_row(name: &str, values: &[f64]) -> Result<[f64; FEATURE_COUNT], ModelError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::Shape(format!("scaler {name} has non-finite values")));
    }
    values.try_into().map_err(|_| {
        ModelError::Shape(format!(
            "scaler {name} has {} values, expected {FEATURE_COUNT}",
            values.len()
        ))
    })
}

impl Scaler for StandardScaler {
    fn transform(&self, row: &FeatureVector) -> FeatureVector {
        let x = row.values();
        let scaled: [f64; FEATURE_COUNT] =
            std::array::from_fn(|i| (x[i] - self.mean[i]) / self.scale[i]);
        FeatureVector::from(scaled)
    }
}
