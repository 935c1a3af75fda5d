//! Random-forest classifier evaluated from an exported tree dump.
//!
//! Each tree is a flat node array. A split node sends a row to `left` when
//! `row[feature] <= threshold` and to `right` otherwise; a leaf holds one
//! weight per class. The forest averages each tree's normalised class
//! weights and predicts the class with the highest mean, preferring the
//! earlier class on ties.

use serde::{Deserialize, Serialize};

use parkcheck_core::models::features::{FEATURE_COUNT, FeatureVector};
use parkcheck_core::models::label::Label;

use crate::Classifier;
use crate::error::ModelError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

/// On-disk form of a fitted random forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub trees: Vec<Tree>,
}

/// A validated random forest, ready to evaluate.
#[derive(Debug, Clone)]
pub struct RandomForest {
    labels: Vec<Label>,
    trees: Vec<Tree>,
}

impl TryFrom<ForestArtifact> for RandomForest {
    type Error = ModelError;

    fn try_from(artifact: ForestArtifact) -> Result<Self, Self::Error> {
        if artifact.n_features != FEATURE_COUNT {
            return Err(ModelError::Shape(format!(
                "forest expects {} features, expected {FEATURE_COUNT}",
                artifact.n_features
            )));
        }
        if artifact.classes.len() != 2 {
            return Err(ModelError::Shape(format!(
                "forest has {} classes, expected 2",
                artifact.classes.len()
            )));
        }
        let labels = artifact
            .classes
            .iter()
            .map(|c| Label::try_from(*c).map_err(|e| ModelError::Shape(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        if labels[0] == labels[1] {
            return Err(ModelError::Shape(format!(
                "forest lists class {} twice",
                labels[0].as_class()
            )));
        }
        if artifact.trees.is_empty() {
            return Err(ModelError::Shape("forest has no trees".to_string()));
        }

        for (t, tree) in artifact.trees.iter().enumerate() {
            check_tree(t, tree, labels.len())?;
        }

        Ok(Self {
            labels,
            trees: artifact.trees,
        })
    }
}

/// Children must come after their parent, which rules out cycles and
/// guarantees every walk ends at a leaf.
fn check_tree(t: usize, tree: &Tree, n_classes: usize) -> Result<(), ModelError> {
    if tree.nodes.is_empty() {
        return Err(ModelError::Shape(format!("tree {t} has no nodes")));
    }
    let n = tree.nodes.len();
    for (i, node) in tree.nodes.iter().enumerate() {
        match node {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= FEATURE_COUNT {
                    return Err(ModelError::Shape(format!(
                        "tree {t} node {i} splits on feature {feature}"
                    )));
                }
                if threshold.is_nan() {
                    return Err(ModelError::Shape(format!("tree {t} node {i} has NaN threshold")));
                }
                for child in [*left, *right] {
                    if child <= i || child >= n {
                        return Err(ModelError::Shape(format!(
                            "tree {t} node {i} has invalid child {child}"
                        )));
                    }
                }
            }
            Node::Leaf { value } => {
                if value.len() != n_classes {
                    return Err(ModelError::Shape(format!(
                        "tree {t} leaf {i} has {} weights, expected {n_classes}",
                        value.len()
                    )));
                }
                if value.iter().any(|w| !w.is_finite() || *w < 0.0) || value.iter().sum::<f64>() <= 0.0
                {
                    return Err(ModelError::Shape(format!(
                        "tree {t} leaf {i} has invalid weights"
                    )));
                }
            }
        }
    }
    Ok(())
}

impl Tree {
    /// Walk from the root to a leaf and return its class weights.
    fn leaf(&self, x: &[f64; FEATURE_COUNT]) -> &[f64] {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    i = if x[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { value } => return value,
            }
        }
    }
}

impl RandomForest {
    /// Mean class probabilities across all trees.
    pub fn predict_proba(&self, row: &FeatureVector) -> Vec<f64> {
        let mut proba = vec![0.0; self.labels.len()];
        for tree in &self.trees {
            let weights = tree.leaf(row.values());
            let total: f64 = weights.iter().sum();
            for (p, w) in proba.iter_mut().zip(weights) {
                *p += w / total;
            }
        }
        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        proba
    }
}

impl Classifier for RandomForest {
    fn predict(&self, row: &FeatureVector) -> Label {
        let proba = self.predict_proba(row);
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        self.labels[best]
    }
}
