//! Configuration module for Rustcast.
//!
//! Every tunable the pipeline uses lives here with a documented default.
//! Sections load from environment variables (`from_env`) or from a TOML file
//! whose missing keys fall back to the same defaults.

mod attribution_config;
mod backtest_config;
mod env_parse;
mod feature_config;
mod model_config;

pub use attribution_config::AttributionConfig;
pub use backtest_config::BacktestConfig;
pub use feature_config::FeatureConfig;
pub use model_config::ModelConfig;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Main configuration, one section per component.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub features: FeatureConfig,
    pub model: ModelConfig,
    pub backtest: BacktestConfig,
    pub attribution: AttributionConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            features: FeatureConfig::from_env()?,
            model: ModelConfig::from_env()?,
            backtest: BacktestConfig::from_env()?,
            attribution: AttributionConfig::from_env()?,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    /// Loads a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}
