use super::forest::ForestModel;
use super::linear::LinearModel;
use crate::config::ModelConfig;
use crate::domain::errors::{ModelError, PersistenceError};
use crate::domain::ml::feature_registry::{
    FEATURE_COUNT, FEATURE_NAMES, FeatureVector, feature_names,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Version of the persisted model layout. Bump on any incompatible change.
pub const SCHEMA_VERSION: u32 = 1;

/// Which estimator to fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    Ridge,
    Forest,
    Mean,
}

impl FromStr for ModelKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ridge" | "linear" => Ok(ModelKind::Ridge),
            "forest" | "random_forest" => Ok(ModelKind::Forest),
            "mean" | "baseline" => Ok(ModelKind::Mean),
            _ => anyhow::bail!(
                "Invalid model kind: {}. Must be 'ridge', 'forest', or 'mean'",
                s
            ),
        }
    }
}

/// Predicts the training-set mean regardless of input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanModel {
    pub mean: f64,
}

/// Fitted estimator state.
///
/// The variant decides which attribution fallback applies: `Linear` exposes
/// coefficients, `TreeEnsemble` exposes importances, `Opaque` exposes neither.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Estimator {
    Linear(LinearModel),
    TreeEnsemble(ForestModel),
    Opaque(MeanModel),
}

/// A fitted model together with the feature schema it was trained on.
#[derive(Debug, Serialize, Deserialize)]
pub struct Model {
    pub schema_version: u32,
    pub feature_names: Vec<String>,
    pub estimator: Estimator,
}

impl Model {
    pub fn new(estimator: Estimator) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            feature_names: feature_names(),
            estimator,
        }
    }

    /// Fits a fresh estimator. Zero rows is `InsufficientData`, never a fit on nothing.
    pub fn fit(
        kind: ModelKind,
        config: &ModelConfig,
        x: &[FeatureVector],
        y: &[f64],
    ) -> Result<Self, ModelError> {
        if x.is_empty() {
            return Err(ModelError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        if x.len() != y.len() {
            return Err(ModelError::ShapeMismatch {
                rows: x.len(),
                labels: y.len(),
            });
        }
        if x.iter().flatten().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteInput);
        }

        let estimator = match kind {
            ModelKind::Ridge => Estimator::Linear(LinearModel::fit(x, y, config.ridge_alpha)?),
            ModelKind::Forest => Estimator::TreeEnsemble(ForestModel::fit(x, y, config)?),
            ModelKind::Mean => Estimator::Opaque(MeanModel {
                mean: y.iter().sum::<f64>() / y.len() as f64,
            }),
        };
        Ok(Self::new(estimator))
    }

    /// Predictions for each row; an empty input gives an empty output.
    pub fn predict(&self, x: &[FeatureVector]) -> Result<Vec<f64>, ModelError> {
        if x.is_empty() {
            return Ok(Vec::new());
        }
        match &self.estimator {
            Estimator::Linear(m) => Ok(m.predict(x)),
            Estimator::TreeEnsemble(m) => m.predict(x),
            Estimator::Opaque(m) => Ok(vec![m.mean; x.len()]),
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self.estimator {
            Estimator::Linear(_) => ModelKind::Ridge,
            Estimator::TreeEnsemble(_) => ModelKind::Forest,
            Estimator::Opaque(_) => ModelKind::Mean,
        }
    }

    pub fn coefficients(&self) -> Option<&[f64]> {
        match &self.estimator {
            Estimator::Linear(m) => Some(&m.coefficients),
            _ => None,
        }
    }

    pub fn feature_importances(&self) -> Option<&[f64]> {
        match &self.estimator {
            Estimator::TreeEnsemble(m) => Some(&m.importances),
            _ => None,
        }
    }

    /// Checks that a deserialised model matches what the pipeline produces.
    pub fn validate_schema(&self) -> Result<(), PersistenceError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: self.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        if self.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(PersistenceError::SchemaMismatch {
                expected: feature_names(),
                found: self.feature_names.clone(),
            });
        }
        let width = self
            .coefficients()
            .or_else(|| self.feature_importances())
            .map(|v| v.len());
        match width {
            Some(found) if found != FEATURE_COUNT => Err(PersistenceError::WidthMismatch {
                expected: FEATURE_COUNT,
                found,
            }),
            _ => Ok(()),
        }
    }
}
