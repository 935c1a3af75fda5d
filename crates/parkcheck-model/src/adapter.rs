use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use parkcheck_core::models::features::FeatureVector;
use parkcheck_core::models::label::Label;
use parkcheck_core::models::reading::ClinicalReading;

use crate::error::ModelError;
use crate::forest::{ForestArtifact, RandomForest};
use crate::scaler::{ScalerArtifact, StandardScaler};
use crate::{Classifier, Scaler};

/// The scaler and classifier pair, immutable once loaded.
pub struct ModelArtifacts {
    scaler: Box<dyn Scaler>,
    classifier: Box<dyn Classifier>,
}

/// Scales a feature row and classifies it.
///
/// Cheap to clone: the artifacts are shared by reference. An adapter whose
/// artifacts failed to load stays unavailable for its whole lifetime and
/// answers every prediction with [`ModelError::Unavailable`].
#[derive(Clone)]
pub struct ClassifierAdapter {
    artifacts: Option<Arc<ModelArtifacts>>,
}

impl ClassifierAdapter {
    pub fn new(scaler: impl Scaler + 'static, classifier: impl Classifier + 'static) -> Self {
        Self {
            artifacts: Some(Arc::new(ModelArtifacts {
                scaler: Box::new(scaler),
                classifier: Box::new(classifier),
            })),
        }
    }

    pub fn unavailable() -> Self {
        Self { artifacts: None }
    }

    /// Load both artifacts, failing on the first problem.
    pub fn try_load(model_path: &Path, scaler_path: &Path) -> Result<Self, ModelError> {
        let forest: ForestArtifact = read_json(model_path)?;
        let forest = RandomForest::try_from(forest)?;
        let scaler: ScalerArtifact = read_json(scaler_path)?;
        let scaler = StandardScaler::try_from(scaler)?;
        Ok(Self::new(scaler, forest))
    }

    /// Load both artifacts, logging and degrading to an unavailable adapter
    /// on failure.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Self {
        match Self::try_load(model_path, scaler_path) {
            Ok(adapter) => {
                info!(
                    model = %model_path.display(),
                    scaler = %scaler_path.display(),
                    "classifier artifacts loaded"
                );
                adapter
            }
            Err(e) => {
                warn!(error = %e, "classifier artifacts unavailable");
                Self::unavailable()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.artifacts.is_some()
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<Label, ModelError> {
        let artifacts = self.artifacts.as_ref().ok_or(ModelError::Unavailable)?;
        let scaled = artifacts.scaler.transform(features);
        let label = artifacts.classifier.predict(&scaled);
        debug!(label = label.as_class(), "classified feature row");
        Ok(label)
    }

    /// Assemble the feature row from a validated reading and classify it.
    pub fn classify(&self, reading: &ClinicalReading) -> Result<Label, ModelError> {
        self.predict(&FeatureVector::from(reading))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
