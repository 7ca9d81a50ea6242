use super::performance::metrics::RiskMetrics;
use serde::{Deserialize, Serialize};

pub const NOT_ENOUGH_SAMPLES: &str = "Not enough samples for backtest";

/// Outcome of a walk-forward backtest.
///
/// Serialises to a flat record: either
/// `{samples, mse, cagr, sharpe, max_drawdown}` or `{samples, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BacktestResult {
    Completed {
        samples: usize,
        mse: f64,
        cagr: f64,
        sharpe: f64,
        max_drawdown: f64,
    },
    Infeasible {
        samples: usize,
        error: String,
    },
}

impl BacktestResult {
    pub fn completed(samples: usize, mse: f64, metrics: RiskMetrics) -> Self {
        Self::Completed {
            samples,
            mse,
            cagr: metrics.cagr,
            sharpe: metrics.sharpe,
            max_drawdown: metrics.max_drawdown,
        }
    }

    pub fn infeasible(samples: usize, error: impl Into<String>) -> Self {
        Self::Infeasible {
            samples,
            error: error.into(),
        }
    }

    pub fn samples(&self) -> usize {
        match self {
            Self::Completed { samples, .. } | Self::Infeasible { samples, .. } => *samples,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Infeasible { error, .. } => Some(error),
            Self::Completed { .. } => None,
        }
    }
}
