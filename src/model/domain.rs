//! Domain types for the pre-trained classifier and its artefact format.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::analysis::domain::{FeatureVector, FEATURE_NAMES};
use crate::common::error::{CytoError, CytoResult};

use super::engines::{LogisticPipeline, TreeEnsemble};

/// Binary classifier output for one feature vector.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Diagnosis {
    Benign = 0,
    Malignant = 1,
}

impl Diagnosis {
    /// Map a raw class label onto a diagnosis. Only 0 and 1 are valid.
    pub fn from_label(label: u8) -> CytoResult<Self> {
        match label {
            0 => Ok(Diagnosis::Benign),
            1 => Ok(Diagnosis::Malignant),
            other => Err(CytoError::Prediction(format!(
                "unexpected class label {other}"
            ))),
        }
    }

    pub fn label(self) -> u8 {
        self as u8
    }
}

/// Model families an artefact can describe.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ModelKind {
    Logistic,
    Forest,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Logistic => "logistic",
            ModelKind::Forest => "forest",
        }
    }
}

/// Anything able to classify a feature vector.
///
/// Implementations must be deterministic: the same row always yields the
/// same diagnosis.
pub trait Predictor: Send + Sync {
    fn kind(&self) -> ModelKind;
    fn predict(&self, row: &FeatureVector) -> CytoResult<Diagnosis>;
}

/// Process-wide handle to the loaded predictor, or the unavailable sentinel.
///
/// Built once at startup and never mutated; clones share the same predictor.
#[derive(Clone, Default)]
pub struct ModelHandle {
    inner: Option<Arc<dyn Predictor>>,
}

impl ModelHandle {
    pub fn loaded<P>(predictor: P) -> Self
    where
        P: Predictor + 'static,
    {
        Self::from_arc(Arc::new(predictor))
    }

    pub fn from_arc(predictor: Arc<dyn Predictor>) -> Self {
        Self {
            inner: Some(predictor),
        }
    }

    pub fn unavailable() -> Self {
        Self { inner: None }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    /// Borrow the predictor, or fail with `ModelUnavailable` for the sentinel.
    pub fn predictor(&self) -> CytoResult<&dyn Predictor> {
        self.inner.as_deref().ok_or(CytoError::ModelUnavailable)
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(p) => write!(f, "ModelHandle({})", p.kind().as_str()),
            None => f.write_str("ModelHandle(unavailable)"),
        }
    }
}

/// Serialized predictor as stored on disk.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub name: Option<String>,
    /// Column names the model was trained on; checked against `FEATURE_NAMES`.
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(flatten)]
    pub body: ArtifactBody,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactBody {
    Logistic(LogisticSpec),
    Forest(ForestSpec),
}

/// Optional standard scaler followed by a logistic regression.
#[derive(Clone, Debug, Deserialize)]
pub struct LogisticSpec {
    #[serde(default)]
    pub scaler: Option<ScalerSpec>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ScalerSpec {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Majority-vote ensemble of decision trees.
#[derive(Clone, Debug, Deserialize)]
pub struct ForestSpec {
    pub trees: Vec<TreeSpec>,
}

/// Flat node array rooted at index 0.
#[derive(Clone, Debug, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<NodeSpec>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: u8,
    },
}

fn default_threshold() -> f64 {
    0.5
}

impl ModelArtifact {
    pub fn kind(&self) -> ModelKind {
        match self.body {
            ArtifactBody::Logistic(_) => ModelKind::Logistic,
            ArtifactBody::Forest(_) => ModelKind::Forest,
        }
    }

    /// Validate the artefact and build the matching engine.
    pub fn into_predictor(self) -> CytoResult<Arc<dyn Predictor>> {
        if let Some(features) = &self.features {
            let matches = features.len() == FEATURE_NAMES.len()
                && features.iter().zip(FEATURE_NAMES).all(|(a, b)| a == b);
            if !matches {
                return Err(CytoError::invalid_artifact(format!(
                    "feature columns {features:?} do not match {FEATURE_NAMES:?}"
                )));
            }
        }

        let predictor: Arc<dyn Predictor> = match self.body {
            ArtifactBody::Logistic(spec) => Arc::new(LogisticPipeline::from_spec(spec)?),
            ArtifactBody::Forest(spec) => Arc::new(TreeEnsemble::from_spec(spec)?),
        };
        Ok(predictor)
    }
}
