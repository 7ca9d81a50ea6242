//! Walk-forward (expanding-window) backtest.
//!
//! Rows are never shuffled: fold `k` trains on every row before its test
//! block and tests on a contiguous later block, so no test observation can
//! influence a model that predicts an earlier one. Each fold fits a fresh
//! ridge model; nothing carries over between folds.

use crate::application::ml::model::{Model, ModelKind};
use crate::config::{BacktestConfig, ModelConfig};
use crate::domain::backtest::{BacktestResult, NOT_ENOUGH_SAMPLES};
use crate::domain::ml::feature_registry::FeatureVector;
use crate::domain::performance::metrics::RiskMetrics;
use std::ops::Range;
use tracing::{debug, info, warn};

/// One train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub index: usize,
    pub train: Range<usize>,
    pub test: Range<usize>,
}

/// Expanding-window folds over `n_samples` rows.
///
/// `test_size = n_samples / (splits + 1)`; the test blocks are the last
/// `splits` blocks of that size, and each fold trains on everything before
/// its block. Empty when `splits == 0` or `n_samples < splits + 1`.
pub fn chronological_folds(n_samples: usize, splits: usize) -> Vec<Fold> {
    if splits == 0 || n_samples < splits + 1 {
        return Vec::new();
    }
    let test_size = n_samples / (splits + 1);
    let first_test = n_samples - splits * test_size;

    (0..splits)
        .map(|k| {
            let start = first_test + k * test_size;
            Fold {
                index: k,
                train: 0..start,
                test: start..start + test_size,
            }
        })
        .collect()
}

/// One out-of-sample prediction, in time order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutOfSample {
    pub row: usize,
    pub prediction: f64,
    pub actual: f64,
}

/// Full walk-forward output: the summary record plus what produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkForwardReport {
    pub result: BacktestResult,
    pub folds: Vec<Fold>,
    pub out_of_sample: Vec<OutOfSample>,
    pub strategy_returns: Vec<f64>,
}

impl WalkForwardReport {
    fn infeasible(samples: usize, error: impl Into<String>) -> Self {
        Self {
            result: BacktestResult::infeasible(samples, error),
            folds: Vec::new(),
            out_of_sample: Vec::new(),
            strategy_returns: Vec::new(),
        }
    }
}

pub struct WalkForwardEvaluator {
    backtest: BacktestConfig,
    model: ModelConfig,
}

impl WalkForwardEvaluator {
    pub fn new(backtest: BacktestConfig, model: ModelConfig) -> Self {
        Self { backtest, model }
    }

    /// Default configuration with a custom fold count.
    pub fn with_splits(splits: usize) -> Self {
        Self::new(
            BacktestConfig {
                splits,
                ..BacktestConfig::default()
            },
            ModelConfig::default(),
        )
    }

    pub fn evaluate(&self, x: &[FeatureVector], y: &[f64]) -> BacktestResult {
        self.evaluate_detailed(x, y).result
    }

    pub fn evaluate_detailed(&self, x: &[FeatureVector], y: &[f64]) -> WalkForwardReport {
        let n = x.len();
        let splits = self.backtest.splits;

        if x.len() != y.len() {
            return WalkForwardReport::infeasible(
                n,
                format!("Feature rows ({}) and labels ({}) differ", x.len(), y.len()),
            );
        }
        if splits == 0 {
            return WalkForwardReport::infeasible(n, "Backtest requires at least one split");
        }
        if n < splits + 1 {
            debug!("Backtest skipped: {} rows for {} splits", n, splits);
            return WalkForwardReport::infeasible(n, NOT_ENOUGH_SAMPLES);
        }

        let folds = chronological_folds(n, splits);
        let mut out_of_sample = Vec::with_capacity(n);

        for fold in &folds {
            let train_x = &x[fold.train.clone()];
            let train_y = &y[fold.train.clone()];
            let test_x = &x[fold.test.clone()];

            let predictions = Model::fit(ModelKind::Ridge, &self.model, train_x, train_y)
                .and_then(|model| model.predict(test_x));
            let predictions = match predictions {
                Ok(p) => p,
                Err(e) => {
                    warn!("Walk-forward fold {} failed: {}", fold.index, e);
                    return WalkForwardReport::infeasible(
                        n,
                        format!("Fold {} failed: {}", fold.index, e),
                    );
                }
            };

            debug!(
                "Fold {}: train [0, {}), test [{}, {})",
                fold.index, fold.train.end, fold.test.start, fold.test.end
            );
            out_of_sample.extend(fold.test.clone().zip(predictions).map(|(row, prediction)| {
                OutOfSample {
                    row,
                    prediction,
                    actual: y[row],
                }
            }));
        }

        let samples = out_of_sample.len();
        let mse = out_of_sample
            .iter()
            .map(|o| (o.prediction - o.actual).powi(2))
            .sum::<f64>()
            / samples as f64;

        // Long when the model expects a gain, flat otherwise.
        let strategy_returns: Vec<f64> = out_of_sample
            .iter()
            .map(|o| if o.prediction > 0.0 { o.actual } else { 0.0 })
            .collect();

        let metrics = RiskMetrics::from_returns(
            &strategy_returns,
            self.backtest.periods_per_year,
            self.backtest.risk_free_rate,
        );
        info!(
            "Walk-forward backtest: {} OOS samples, mse={:.6}, sharpe={:.3}, max_dd={:.4}",
            samples, mse, metrics.sharpe, metrics.max_drawdown
        );

        WalkForwardReport {
            result: BacktestResult::completed(samples, mse, metrics),
            folds,
            out_of_sample,
            strategy_returns,
        }
    }
}
