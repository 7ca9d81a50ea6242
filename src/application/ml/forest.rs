use crate::config::ModelConfig;
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::{FEATURE_COUNT, FeatureVector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;
use tracing::debug;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest regressor with permutation importances computed at fit time
#[derive(Serialize, Deserialize)]
pub struct ForestModel {
    forest: Forest,
    pub importances: Vec<f64>,
}

impl fmt::Debug for ForestModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForestModel")
            .field("importances", &self.importances)
            .finish_non_exhaustive()
    }
}

impl ForestModel {
    pub fn fit(x: &[FeatureVector], y: &[f64], config: &ModelConfig) -> Result<Self, ModelError> {
        let matrix = to_matrix(x)?;
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(config.forest_trees)
            .with_max_depth(config.forest_max_depth)
            .with_min_samples_split(config.forest_min_split);

        let forest = RandomForestRegressor::fit(&matrix, &y.to_vec(), params)
            .map_err(|e| ModelError::Backend(format!("Training error: {}", e)))?;

        let mut model = Self {
            forest,
            importances: Vec::new(),
        };
        model.importances = model.permutation_importances(x, y, config.importance_seed)?;
        debug!("Forest importances: {:?}", model.importances);
        Ok(model)
    }

    pub fn predict(&self, x: &[FeatureVector]) -> Result<Vec<f64>, ModelError> {
        let matrix = to_matrix(x)?;
        self.forest
            .predict(&matrix)
            .map_err(|e| ModelError::Backend(format!("Prediction failed: {}", e)))
    }

    /// Increase in training MSE when each column is shuffled in turn.
    fn permutation_importances(
        &self,
        x: &[FeatureVector],
        y: &[f64],
        seed: u64,
    ) -> Result<Vec<f64>, ModelError> {
        let baseline = mse(&self.predict(x)?, y);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut importances = Vec::with_capacity(FEATURE_COUNT);
        for j in 0..FEATURE_COUNT {
            let mut column: Vec<f64> = x.iter().map(|row| row[j]).collect();
            column.shuffle(&mut rng);
            let permuted: Vec<FeatureVector> = x
                .iter()
                .zip(column)
                .map(|(row, v)| {
                    let mut r = *row;
                    r[j] = v;
                    r
                })
                .collect();
            importances.push(mse(&self.predict(&permuted)?, y) - baseline);
        }
        Ok(importances)
    }
}

fn to_matrix(x: &[FeatureVector]) -> Result<DenseMatrix<f64>, ModelError> {
    let rows: Vec<Vec<f64>> = x.iter().map(|r| r.to_vec()).collect();
    DenseMatrix::from_2d_vec(&rows)
        .map_err(|e| ModelError::Backend(format!("Matrix creation failed: {}", e)))
}

fn mse(pred: &[f64], actual: &[f64]) -> f64 {
    if pred.is_empty() {
        return 0.0;
    }
    pred.iter()
        .zip(actual.iter())
        .map(|(p, a)| (p - a).powi(2))
        .sum::<f64>()
        / pred.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forest_ranks_informative_feature_first() {
        let x: Vec<FeatureVector> = (0..120)
            .map(|i| {
                let t = i as f64;
                [(t * 0.37).sin(), 0.0, 50.0 + (t * 1.3).cos(), 0.0]
            })
            .collect();
        let y: Vec<f64> = x.iter().map(|r| r[0] * 0.02).collect();

        let config = ModelConfig {
            forest_trees: 20,
            forest_max_depth: 6,
            forest_min_split: 2,
            ..ModelConfig::default()
        };
        let model = ForestModel::fit(&x, &y, &config).unwrap();

        assert_eq!(model.importances.len(), FEATURE_COUNT);
        assert!(model.importances[0] > model.importances[1].abs());
        assert!(model.importances[0] > model.importances[2]);
        assert_eq!(model.predict(&x[..5]).unwrap().len(), 5);
    }
}
