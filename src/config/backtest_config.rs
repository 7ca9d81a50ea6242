//! Walk-forward backtest configuration.

use super::env_parse::parse_or;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Number of expanding-window folds
    pub splits: usize,
    /// Trading periods per year used to annualise CAGR and Sharpe
    pub periods_per_year: f64,
    /// Annual risk-free rate subtracted before computing Sharpe
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            splits: 5,
            periods_per_year: 252.0,
            risk_free_rate: 0.0,
        }
    }
}

impl BacktestConfig {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            splits: parse_or("BACKTEST_SPLITS", d.splits)?,
            periods_per_year: parse_or("BACKTEST_PERIODS_PER_YEAR", d.periods_per_year)?,
            risk_free_rate: parse_or("BACKTEST_RISK_FREE_RATE", d.risk_free_rate)?,
        })
    }
}
