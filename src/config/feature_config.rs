//! Feature pipeline configuration.

use super::env_parse::parse_or;
use anyhow::Result;
use serde::Deserialize;

/// Window lengths and fill policy for the feature pipeline
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Trailing window for `vol` (rolling std of `ret1`)
    pub vol_window: usize,
    /// Wilder-style smoothing period for `rsi` (alpha = 1 / period)
    pub rsi_period: usize,
    /// Trailing window for the `sentiment` z-score
    pub sentiment_window: usize,
    /// Fill value for undefined `rsi`
    pub rsi_neutral: f64,
    /// Added to denominators (RSI average loss, sentiment std)
    pub epsilon: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            vol_window: 10,
            rsi_period: 14,
            sentiment_window: 14,
            rsi_neutral: 50.0,
            epsilon: 1e-9,
        }
    }
}

impl FeatureConfig {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            vol_window: parse_or("FEATURE_VOL_WINDOW", d.vol_window)?,
            rsi_period: parse_or("FEATURE_RSI_PERIOD", d.rsi_period)?,
            sentiment_window: parse_or("FEATURE_SENTIMENT_WINDOW", d.sentiment_window)?,
            rsi_neutral: parse_or("FEATURE_RSI_NEUTRAL", d.rsi_neutral)?,
            epsilon: parse_or("FEATURE_EPSILON", d.epsilon)?,
        })
    }
}
