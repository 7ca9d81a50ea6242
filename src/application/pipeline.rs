//! End-to-end entry points that tie the feature pipeline to the model, the
//! walk-forward evaluator, and attribution.

use crate::application::explain::attribution::AttributionExplainer;
use crate::application::forecast::{Forecast, forecast};
use crate::application::market_data::feature_pipeline::build_dataset;
use crate::application::ml::model::{Model, ModelKind};
use crate::application::optimization::walk_forward::WalkForwardEvaluator;
use crate::config::Config;
use crate::domain::backtest::BacktestResult;
use crate::domain::errors::{ModelError, PersistenceError};
use crate::domain::market::price_series::PriceSeries;
use crate::infrastructure::persistence::model_store::ModelStore;
use tracing::info;

/// Walk-forward backtest of `series`.
pub fn backtest_series(series: &PriceSeries, config: &Config) -> BacktestResult {
    let dataset = build_dataset(series, &config.features);
    let evaluator = WalkForwardEvaluator::new(config.backtest.clone(), config.model.clone());
    evaluator.evaluate(&dataset.features, &dataset.labels)
}

/// Forecast for the latest bar of `series` using `model`.
pub fn predict_series(
    series: &PriceSeries,
    config: &Config,
    model: &Model,
) -> Result<Forecast, ModelError> {
    let dataset = build_dataset(series, &config.features);
    let explainer = AttributionExplainer::new(config.attribution.clone());
    forecast(model, &dataset, &explainer)
}

/// Fits `kind` on every labeled row of `series` and stores it at `store`.
pub fn train_series(
    series: &PriceSeries,
    config: &Config,
    kind: ModelKind,
    store: &ModelStore,
) -> Result<Model, PersistenceError> {
    let dataset = build_dataset(series, &config.features);
    let model = Model::fit(kind, &config.model, &dataset.features, &dataset.labels)?;
    info!(
        "Trained {:?} model on {} rows",
        model.kind(),
        dataset.len()
    );
    store.save(&model)?;
    Ok(model)
}
