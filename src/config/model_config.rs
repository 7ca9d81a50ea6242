//! Model training and persistence configuration.

use super::env_parse::{parse_opt, parse_or};
use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Hyperparameters for every estimator variant plus the bootstrap policy
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model_path: PathBuf,
    /// L2 penalty of the ridge regressor
    pub ridge_alpha: f64,
    /// Rows in the synthetic bootstrap training set
    pub bootstrap_rows: usize,
    /// Fixed seed for the bootstrap sample; entropy when unset
    pub bootstrap_seed: Option<u64>,
    pub forest_trees: usize,
    pub forest_max_depth: u16,
    pub forest_min_split: usize,
    /// Seed for the permutation-importance shuffles
    pub importance_seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/latest_model.json"),
            ridge_alpha: 1.0,
            bootstrap_rows: 200,
            bootstrap_seed: None,
            forest_trees: 100,
            forest_max_depth: 10,
            forest_min_split: 5,
            importance_seed: 42,
        }
    }
}

impl ModelConfig {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(d.model_path),
            ridge_alpha: parse_or("MODEL_RIDGE_ALPHA", d.ridge_alpha)?,
            bootstrap_rows: parse_or("MODEL_BOOTSTRAP_ROWS", d.bootstrap_rows)?,
            bootstrap_seed: parse_opt("MODEL_BOOTSTRAP_SEED")?,
            forest_trees: parse_or("MODEL_FOREST_TREES", d.forest_trees)?,
            forest_max_depth: parse_or("MODEL_FOREST_MAX_DEPTH", d.forest_max_depth)?,
            forest_min_split: parse_or("MODEL_FOREST_MIN_SPLIT", d.forest_min_split)?,
            importance_seed: parse_or("MODEL_IMPORTANCE_SEED", d.importance_seed)?,
        })
    }
}
