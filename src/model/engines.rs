//! Concrete predictors built from validated artefacts.

use crate::analysis::domain::{FeatureVector, FEATURE_COUNT};
use crate::common::error::{CytoError, CytoResult};

use super::domain::{Diagnosis, ForestSpec, LogisticSpec, ModelKind, NodeSpec, Predictor};

fn to_row(name: &str, values: Vec<f64>) -> CytoResult<[f64; FEATURE_COUNT]> {
    let row: [f64; FEATURE_COUNT] = values.try_into().map_err(|v: Vec<f64>| {
        CytoError::invalid_artifact(format!(
            "{name} has {} entries, expected {FEATURE_COUNT}",
            v.len()
        ))
    })?;
    if row.iter().any(|v| !v.is_finite()) {
        return Err(CytoError::invalid_artifact(format!(
            "{name} contains non-finite values"
        )));
    }
    Ok(row)
}

/// Standard scaler followed by a logistic regression.
#[derive(Clone, Debug)]
pub struct LogisticPipeline {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
    threshold: f64,
}

impl LogisticPipeline {
    pub fn from_spec(spec: LogisticSpec) -> CytoResult<Self> {
        let (mean, scale) = match spec.scaler {
            Some(scaler) => {
                let mean = to_row("scaler.mean", scaler.mean)?;
                // Zero-variance columns are left unscaled.
                let scale = to_row("scaler.scale", scaler.scale)?
                    .map(|s| if s == 0.0 { 1.0 } else { s });
                (mean, scale)
            }
            None => ([0.0; FEATURE_COUNT], [1.0; FEATURE_COUNT]),
        };

        if !spec.intercept.is_finite() {
            return Err(CytoError::invalid_artifact("intercept is not finite"));
        }
        if !(0.0..=1.0).contains(&spec.threshold) {
            return Err(CytoError::invalid_artifact(format!(
                "threshold {} is outside [0, 1]",
                spec.threshold
            )));
        }

        Ok(Self {
            mean,
            scale,
            coefficients: to_row("coefficients", spec.coefficients)?,
            intercept: spec.intercept,
            threshold: spec.threshold,
        })
    }

    /// Linear score of the scaled row.
    pub fn decision(&self, row: &FeatureVector) -> f64 {
        row.to_f64()
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .zip(&self.coefficients)
            .map(|((x, (m, s)), c)| c * (x - m) / s)
            .sum::<f64>()
            + self.intercept
    }

    /// Probability of the malignant class.
    pub fn probability(&self, row: &FeatureVector) -> f64 {
        1.0 / (1.0 + (-self.decision(row)).exp())
    }
}

impl Predictor for LogisticPipeline {
    fn kind(&self) -> ModelKind {
        ModelKind::Logistic
    }

    fn predict(&self, row: &FeatureVector) -> CytoResult<Diagnosis> {
        let p = self.probability(row);
        if p.is_nan() {
            return Err(CytoError::Prediction(format!(
                "score is not a number for {:?}",
                row.values()
            )));
        }
        Ok(if p >= self.threshold {
            Diagnosis::Malignant
        } else {
            Diagnosis::Benign
        })
    }
}

#[derive(Clone, Debug)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(Diagnosis),
}

#[derive(Clone, Debug)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Children always point forward, so every walk ends at a leaf.
    fn build(index: usize, specs: Vec<NodeSpec>) -> CytoResult<Self> {
        if specs.is_empty() {
            return Err(CytoError::invalid_artifact(format!("tree {index} has no nodes")));
        }
        let len = specs.len();
        let nodes = specs
            .into_iter()
            .enumerate()
            .map(|(at, spec)| match spec {
                NodeSpec::Leaf { label } => Diagnosis::from_label(label)
                    .map(Node::Leaf)
                    .map_err(|_| {
                        CytoError::invalid_artifact(format!(
                            "tree {index} node {at}: leaf label {label} is not 0 or 1"
                        ))
                    }),
                NodeSpec::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_COUNT {
                        return Err(CytoError::invalid_artifact(format!(
                            "tree {index} node {at}: feature {feature} out of range"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(CytoError::invalid_artifact(format!(
                            "tree {index} node {at}: threshold is not finite"
                        )));
                    }
                    let forward = |child: usize| child > at && child < len;
                    if !forward(left) || !forward(right) {
                        return Err(CytoError::invalid_artifact(format!(
                            "tree {index} node {at}: children {left}/{right} must point forward within {len} nodes"
                        )));
                    }
                    Ok(Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    })
                }
            })
            .collect::<CytoResult<Vec<_>>>()?;
        Ok(Self { nodes })
    }

    fn classify(&self, row: &[f64; FEATURE_COUNT]) -> Diagnosis {
        let mut at = 0;
        loop {
            match self.nodes[at] {
                Node::Leaf(diagnosis) => return diagnosis,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => at = if row[feature] <= threshold { left } else { right },
            }
        }
    }
}

/// Majority-vote ensemble of decision trees. Ties resolve to malignant.
#[derive(Clone, Debug)]
pub struct TreeEnsemble {
    trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn from_spec(spec: ForestSpec) -> CytoResult<Self> {
        if spec.trees.is_empty() {
            return Err(CytoError::invalid_artifact("forest has no trees"));
        }
        let trees = spec
            .trees
            .into_iter()
            .enumerate()
            .map(|(index, tree)| Tree::build(index, tree.nodes))
            .collect::<CytoResult<Vec<_>>>()?;
        Ok(Self { trees })
    }

    /// Number of trees voting malignant.
    pub fn malignant_votes(&self, row: &FeatureVector) -> usize {
        let x = row.to_f64();
        self.trees
            .iter()
            .filter(|tree| tree.classify(&x) == Diagnosis::Malignant)
            .count()
    }
}

impl Predictor for TreeEnsemble {
    fn kind(&self) -> ModelKind {
        ModelKind::Forest
    }

    fn predict(&self, row: &FeatureVector) -> CytoResult<Diagnosis> {
        let votes = self.malignant_votes(row);
        Ok(if votes * 2 >= self.trees.len() {
            Diagnosis::Malignant
        } else {
            Diagnosis::Benign
        })
    }
}
