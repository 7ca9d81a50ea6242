//! Bootstrap training set for when no persisted model exists.
//!
//! The sample is random but shaped like real pipeline output, and only needs
//! to yield a model whose coefficients exist for the attribution fallback.
//! It says nothing about predictive quality.

use super::model::{Model, ModelKind};
use crate::config::ModelConfig;
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::FeatureVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::info;

/// `rows` synthetic feature rows with labels `y[t] = ret1[t + 1]` (last label 0.0).
pub fn synthetic_training_set(
    rows: usize,
    seed: Option<u64>,
) -> Result<(Vec<FeatureVector>, Vec<f64>), ModelError> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let ret_dist = normal(0.0, 0.01)?;
    let rsi_dist = normal(50.0, 10.0)?;
    let sentiment_dist = normal(0.0, 1.0)?;

    let x: Vec<FeatureVector> = (0..rows)
        .map(|_| {
            [
                ret_dist.sample(&mut rng),
                rng.random_range(0.0..0.02),
                rsi_dist.sample(&mut rng).clamp(0.0, 100.0),
                sentiment_dist.sample(&mut rng),
            ]
        })
        .collect();

    let y = (0..rows)
        .map(|t| x.get(t + 1).map(|next| next[0]).unwrap_or(0.0))
        .collect();

    Ok((x, y))
}

/// Fits a ridge model on a fresh synthetic training set.
pub fn bootstrap_model(config: &ModelConfig) -> Result<Model, ModelError> {
    let (x, y) = synthetic_training_set(config.bootstrap_rows, config.bootstrap_seed)?;
    let model = Model::fit(ModelKind::Ridge, config, &x, &y)?;
    info!(
        "Bootstrapped ridge model on {} synthetic rows (alpha={})",
        x.len(),
        config.ridge_alpha
    );
    Ok(model)
}

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>, ModelError> {
    Normal::new(mean, std_dev)
        .map_err(|e| ModelError::Backend(format!("Invalid distribution: {}", e)))
}
